//! JSON-RPC 2.0 request handling
//!
//! Methods:
//! - ping: Liveness check
//! - convert: Convert a quantity to another unit ("km->mi" style specs accepted)
//! - add / subtract / multiply / divide: Quantity arithmetic
//! - compare: Equality and ordering of two quantities
//! - parse: Parse a quantity string like "5 km"
//! - unit: Look up a unit definition
//! - dimension: Look up a dimension definition
//! - list_dimensions: All registered dimensions, in registration order
//! - define_dimension: Register or overwrite a dimension

use parking_lot::RwLock;
use quantia_core::{ErrorReport, QuantityError};
use quantia_units::{
    parse_conversion, parse_quantity, DimensionDefinition, Quantity, QuantityTransport, UnitRegistry,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::debug;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
/// Engine errors; `data` carries the `ErrorReport`
pub const ENGINE_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<JsonValue>, error: RpcError) -> Self {
        RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        RpcError {
            code,
            message: message.into(),
            data: None,
        }
    }

    fn invalid_params(method: &str, err: impl std::fmt::Display) -> Self {
        RpcError::new(INVALID_PARAMS, format!("Invalid params for '{}': {}", method, err))
    }
}

impl From<QuantityError> for RpcError {
    fn from(err: QuantityError) -> Self {
        RpcError {
            code: ENGINE_ERROR,
            message: err.to_string(),
            data: serde_json::to_value(ErrorReport::from(&err)).ok(),
        }
    }
}

/// A quantity argument: either a transport object or a string like "5 km"
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Operand {
    Text(String),
    Transport(QuantityTransport),
}

impl Operand {
    fn resolve(&self, registry: &UnitRegistry) -> Result<Quantity, QuantityError> {
        match self {
            Operand::Text(text) => parse_quantity(text, registry),
            Operand::Transport(transport) => Quantity::from_transport(transport, registry),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConvertParams {
    Explicit { value: f64, from: String, to: String },
    Quantity { quantity: Operand, to: String },
    /// `{"value": 5, "spec": "km->mi"}`
    Spec { value: f64, spec: String },
}

#[derive(Debug, Deserialize)]
struct BinaryParams {
    left: Operand,
    right: Operand,
}

#[derive(Debug, Deserialize)]
struct TextParams {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SymbolParams {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

#[derive(Debug, Clone, Copy)]
enum Arithmetic {
    Add,
    Subtract,
    Multiply,
    Divide,
}

pub fn handle_request(registry: &RwLock<UnitRegistry>, request: &RpcRequest) -> RpcResponse {
    if request.jsonrpc != JSONRPC_VERSION {
        return RpcResponse::failure(
            request.id.clone(),
            RpcError::new(INVALID_REQUEST, format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
        );
    }

    let params = request.params.as_ref();
    let result = match request.method.as_str() {
        "ping" => Ok(json!({})),
        "convert" => handle_convert(registry, params),
        "add" => handle_arithmetic(registry, params, Arithmetic::Add),
        "subtract" => handle_arithmetic(registry, params, Arithmetic::Subtract),
        "multiply" => handle_arithmetic(registry, params, Arithmetic::Multiply),
        "divide" => handle_arithmetic(registry, params, Arithmetic::Divide),
        "compare" => handle_compare(registry, params),
        "parse" => handle_parse(registry, params),
        "unit" => handle_unit(registry, params),
        "dimension" => handle_dimension(registry, params),
        "list_dimensions" => handle_list_dimensions(registry),
        "define_dimension" => handle_define_dimension(registry, params),
        _ => Err(RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {}", request.method))),
    };

    match result {
        Ok(r) => RpcResponse::success(request.id.clone(), r),
        Err(e) => {
            debug!(method = %request.method, code = e.code, error = %e.message, "request failed");
            RpcResponse::failure(request.id.clone(), e)
        }
    }
}

fn parse_params<T: DeserializeOwned>(method: &str, params: Option<&JsonValue>) -> Result<T, RpcError> {
    let value = params.cloned().unwrap_or(JsonValue::Null);
    serde_json::from_value(value).map_err(|e| RpcError::invalid_params(method, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError::new(ENGINE_ERROR, format!("Failed to encode result: {}", e)))
}

/// JSON has no encoding for infinities or NaN
fn ensure_finite(quantity: &Quantity) -> Result<(), RpcError> {
    if quantity.value().is_finite() {
        Ok(())
    } else {
        Err(QuantityError::NonFinite(quantity.to_display_string()).into())
    }
}

/// Transport form plus the display string
fn quantity_json(quantity: &Quantity) -> Result<JsonValue, RpcError> {
    ensure_finite(quantity)?;
    Ok(json!({
        "value": quantity.value(),
        "unit": quantity.unit_symbol(),
        "display": quantity.to_display_string(),
    }))
}

fn handle_convert(registry: &RwLock<UnitRegistry>, params: Option<&JsonValue>) -> Result<JsonValue, RpcError> {
    let params: ConvertParams = parse_params("convert", params)?;
    let registry = registry.read();

    let converted = match &params {
        ConvertParams::Explicit { value, from, to } => {
            Quantity::new(*value, from, &registry)?.convert_to(to, &registry)?
        }
        ConvertParams::Quantity { quantity, to } => quantity.resolve(&registry)?.convert_to(to, &registry)?,
        ConvertParams::Spec { value, spec } => {
            let (from, to) = parse_conversion(spec)?;
            Quantity::new(*value, from, &registry)?.convert_to(to, &registry)?
        }
    };

    ensure_finite(&converted)?;
    to_json(&converted.to_transport())
}

fn handle_arithmetic(
    registry: &RwLock<UnitRegistry>,
    params: Option<&JsonValue>,
    op: Arithmetic,
) -> Result<JsonValue, RpcError> {
    let method = match op {
        Arithmetic::Add => "add",
        Arithmetic::Subtract => "subtract",
        Arithmetic::Multiply => "multiply",
        Arithmetic::Divide => "divide",
    };
    let params: BinaryParams = parse_params(method, params)?;
    let registry = registry.read();

    let left = params.left.resolve(&registry)?;
    let right = params.right.resolve(&registry)?;

    let result = match op {
        Arithmetic::Add => left.add(&right)?,
        Arithmetic::Subtract => left.subtract(&right)?,
        Arithmetic::Multiply => left.multiply(&right, &registry),
        Arithmetic::Divide => left.divide(&right, &registry)?,
    };

    quantity_json(&result)
}

fn handle_compare(registry: &RwLock<UnitRegistry>, params: Option<&JsonValue>) -> Result<JsonValue, RpcError> {
    let params: BinaryParams = parse_params("compare", params)?;
    let registry = registry.read();

    let left = params.left.resolve(&registry)?;
    let right = params.right.resolve(&registry)?;

    Ok(json!({
        "equals": left.equals(&right),
        "less": left.is_less_than(&right)?,
        "greater": left.is_greater_than(&right)?,
    }))
}

fn handle_parse(registry: &RwLock<UnitRegistry>, params: Option<&JsonValue>) -> Result<JsonValue, RpcError> {
    let params: TextParams = parse_params("parse", params)?;
    let quantity = parse_quantity(&params.text, &registry.read())?;
    quantity_json(&quantity)
}

fn handle_unit(registry: &RwLock<UnitRegistry>, params: Option<&JsonValue>) -> Result<JsonValue, RpcError> {
    let params: SymbolParams = parse_params("unit", params)?;
    let registry = registry.read();
    to_json(registry.get_unit_definition(&params.symbol)?)
}

fn handle_dimension(registry: &RwLock<UnitRegistry>, params: Option<&JsonValue>) -> Result<JsonValue, RpcError> {
    let params: NameParams = parse_params("dimension", params)?;
    let registry = registry.read();
    to_json(registry.get_dimension_definition(&params.name)?)
}

fn handle_list_dimensions(registry: &RwLock<UnitRegistry>) -> Result<JsonValue, RpcError> {
    let registry = registry.read();
    let dimensions: Vec<&DimensionDefinition> = registry.list_dimensions().collect();
    to_json(&dimensions)
}

fn handle_define_dimension(
    registry: &RwLock<UnitRegistry>,
    params: Option<&JsonValue>,
) -> Result<JsonValue, RpcError> {
    let definition: DimensionDefinition = parse_params("define_dimension", params)?;
    let warnings = registry.write().define_dimension(definition)?;
    Ok(json!({ "warnings": to_json(&warnings)? }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RwLock<UnitRegistry> {
        RwLock::new(UnitRegistry::standard())
    }

    fn call(registry: &RwLock<UnitRegistry>, method: &str, params: JsonValue) -> RpcResponse {
        let request: RpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        }))
        .unwrap();
        handle_request(registry, &request)
    }

    fn result(response: RpcResponse) -> JsonValue {
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.unwrap()
    }

    fn error(response: RpcResponse) -> RpcError {
        assert!(response.result.is_none());
        response.error.unwrap()
    }

    #[test]
    fn test_ping() {
        let r = registry();
        assert_eq!(result(call(&r, "ping", JsonValue::Null)), json!({}));
    }

    #[test]
    fn test_convert_explicit() {
        let r = registry();
        let out = result(call(&r, "convert", json!({"value": 1, "from": "km", "to": "m"})));
        assert_eq!(out, json!({"value": 1000.0, "unit": "m"}));
    }

    #[test]
    fn test_convert_quantity_forms() {
        let r = registry();
        let out = result(call(&r, "convert", json!({"quantity": "0 K", "to": "degC"})));
        assert!((out["value"].as_f64().unwrap() + 273.15).abs() < 1e-9);

        let out = result(call(&r, "convert", json!({"quantity": {"value": 2, "unit": "h"}, "to": "min"})));
        assert!((out["value"].as_f64().unwrap() - 120.0).abs() < 1e-9);
        assert_eq!(out["unit"], "min");
    }

    #[test]
    fn test_convert_spec() {
        let r = registry();
        let out = result(call(&r, "convert", json!({"value": 1, "spec": "mi -> km"})));
        assert_eq!(out["unit"], "km");
        assert!((out["value"].as_f64().unwrap() - 1.609344).abs() < 1e-12);

        let out = result(call(&r, "convert", json!({"value": 100, "spec": "degC to degF"})));
        assert!((out["value"].as_f64().unwrap() - 212.0).abs() < 1e-9);

        let err = error(call(&r, "convert", json!({"value": 1, "spec": "km mi"})));
        assert_eq!(err.data.unwrap()["code"], quantia_core::codes::PARSE_ERROR);
    }

    #[test]
    fn test_overflow_is_engine_error() {
        let r = registry();
        let err = error(call(
            &r,
            "multiply",
            json!({"left": {"value": 1e300, "unit": "m"}, "right": {"value": 1e300, "unit": "m"}}),
        ));
        assert_eq!(err.code, ENGINE_ERROR);
        assert_eq!(err.data.unwrap()["code"], quantia_core::codes::NON_FINITE);

        let err = error(call(&r, "parse", json!({"text": "1e400 m"})));
        assert_eq!(err.data.unwrap()["code"], quantia_core::codes::NON_FINITE);

        let err = error(call(&r, "convert", json!({"value": 1e308, "from": "pc", "to": "pm"})));
        assert_eq!(err.data.unwrap()["code"], quantia_core::codes::NON_FINITE);
    }

    #[test]
    fn test_arithmetic() {
        let r = registry();
        let out = result(call(&r, "add", json!({"left": "5 m", "right": "100 cm"})));
        assert_eq!(out["unit"], "m");
        assert!((out["value"].as_f64().unwrap() - 6.0).abs() < 1e-9);

        let out = result(call(&r, "divide", json!({"left": "5 m", "right": {"value": 2, "unit": "s"}})));
        assert_eq!(out["unit"], "m/s");
        assert_eq!(out["display"], "2.50000 m/s");

        let out = result(call(&r, "multiply", json!({"left": "2 m", "right": "3 m"})));
        assert_eq!(out["unit"], "m^2");
    }

    #[test]
    fn test_engine_errors_carry_report() {
        let r = registry();
        let err = error(call(&r, "add", json!({"left": "1 m", "right": "1 s"})));
        assert_eq!(err.code, ENGINE_ERROR);
        assert_eq!(err.data.unwrap()["code"], quantia_core::codes::DIMENSION_MISMATCH);

        let err = error(call(&r, "divide", json!({"left": "10 m", "right": "0 s"})));
        assert_eq!(err.data.unwrap()["code"], quantia_core::codes::DIV_ZERO);

        let err = error(call(&r, "unit", json!({"symbol": "parsecsquared"})));
        let data = err.data.unwrap();
        assert_eq!(data["code"], quantia_core::codes::NOT_FOUND);
        assert!(data["suggestion"].is_string());
    }

    #[test]
    fn test_compare() {
        let r = registry();
        let out = result(call(&r, "compare", json!({"left": "1 km", "right": "1000 m"})));
        assert_eq!(out, json!({"equals": true, "less": false, "greater": false}));

        let out = result(call(&r, "compare", json!({"left": "1 ft", "right": "1 m"})));
        assert_eq!(out, json!({"equals": false, "less": true, "greater": false}));

        let err = error(call(&r, "compare", json!({"left": "1 m", "right": "1 kg"})));
        assert_eq!(err.code, ENGINE_ERROR);
    }

    #[test]
    fn test_parse_method() {
        let r = registry();
        let out = result(call(&r, "parse", json!({"text": "32 degF"})));
        assert_eq!(out["unit"], "degF");
        assert_eq!(out["display"], "32.0000 degF");

        let err = error(call(&r, "parse", json!({"text": "km"})));
        assert_eq!(err.data.unwrap()["code"], quantia_core::codes::PARSE_ERROR);
    }

    #[test]
    fn test_lookups() {
        let r = registry();
        let unit = result(call(&r, "unit", json!({"symbol": "degC"})));
        assert_eq!(unit["dimension"], "Temperature");
        assert_eq!(unit["offset"], 273.15);

        let dim = result(call(&r, "dimension", json!({"name": "Mass"})));
        assert_eq!(dim["baseUnitSymbol"], "kg");

        let dims = result(call(&r, "list_dimensions", JsonValue::Null));
        assert_eq!(dims.as_array().unwrap().len(), 7);
        assert_eq!(dims[0]["name"], "Length");
    }

    #[test]
    fn test_define_dimension() {
        let r = registry();
        let out = result(call(
            &r,
            "define_dimension",
            json!({"name": "Angle", "baseUnitSymbol": "rad", "units": {"deg": {"factor": 0.017453292519943295}}}),
        ));
        assert_eq!(out, json!({"warnings": []}));

        let out = result(call(&r, "convert", json!({"value": 180, "from": "deg", "to": "rad"})));
        assert!((out["value"].as_f64().unwrap() - std::f64::consts::PI).abs() < 1e-9);

        let out = result(call(
            &r,
            "define_dimension",
            json!({"name": "Angle", "baseUnitSymbol": "rad"}),
        ));
        assert_eq!(out["warnings"][0]["kind"], "dimension_redefined");
    }

    #[test]
    fn test_protocol_errors() {
        let r = registry();
        assert_eq!(error(call(&r, "teleport", JsonValue::Null)).code, METHOD_NOT_FOUND);
        assert_eq!(error(call(&r, "convert", json!({"value": 1}))).code, INVALID_PARAMS);
        assert_eq!(error(call(&r, "unit", JsonValue::Null)).code, INVALID_PARAMS);

        let request: RpcRequest =
            serde_json::from_value(json!({"jsonrpc": "1.0", "id": 7, "method": "ping"})).unwrap();
        let response = handle_request(&r, &request);
        assert_eq!(response.id, Some(json!(7)));
        assert_eq!(error(response).code, INVALID_REQUEST);
    }
}
