// RPC响应校验模块 - 防止异常端点返回的数据污染结果

use serde_json::Value;

use crate::error::EndpointError;

/// 验证RPC响应格式，返回 `result` 字段
pub fn validate_rpc_response(json: &Value) -> Result<&Value, EndpointError> {
    // 检查是否有error字段
    if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        return Err(EndpointError::Rpc { code, message });
    }

    // 检查jsonrpc版本
    if let Some(version) = json.get("jsonrpc") {
        if version.as_str() != Some("2.0") {
            return Err(EndpointError::InvalidResponse(format!(
                "unsupported JSON-RPC version: {}",
                version
            )));
        }
    }

    json.get("result")
        .filter(|r| !r.is_null())
        .ok_or_else(|| EndpointError::InvalidResponse("missing result field".into()))
}

/// 解析十六进制数量（余额，最小单位）
pub fn validate_quantity(result: &Value) -> Result<u128, EndpointError> {
    let hex_str = result
        .as_str()
        .ok_or_else(|| EndpointError::InvalidResponse("result is not a string".into()))?;

    let digits = hex_str
        .strip_prefix("0x")
        .or_else(|| hex_str.strip_prefix("0X"))
        .ok_or_else(|| EndpointError::InvalidResponse(format!("not a hex quantity: {}", hex_str)))?;

    if digits.is_empty() {
        return Err(EndpointError::InvalidResponse("empty hex quantity".into()));
    }

    // 去掉前导零后最多32个十六进制字符（u128）
    let significant = digits.trim_start_matches('0');
    if significant.len() > 32 {
        return Err(EndpointError::InvalidResponse(format!(
            "quantity exceeds 128 bits: {} hex digits",
            significant.len()
        )));
    }
    if significant.is_empty() {
        return Ok(0);
    }

    u128::from_str_radix(significant, 16)
        .map_err(|e| EndpointError::InvalidResponse(format!("bad hex quantity: {}", e)))
}

/// 验证区块高度
pub fn validate_block_number(result: &Value) -> Result<u64, EndpointError> {
    let height = validate_quantity(result)?;
    u64::try_from(height)
        .map_err(|_| EndpointError::InvalidResponse("block number exceeds u64".into()))
}
