use lazy_static::lazy_static;
use regex::Regex;

use super::parser::{Literal, VarType};
use super::symbol_table::Value;

lazy_static! {
    static ref INT_PREFIX: Regex = Regex::new(r"^\s*([+-]?)(\d+)").unwrap();
    static ref FLOAT_PREFIX: Regex =
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap();
}

/// Leading integer of `text` with C `atoi` rules. Out-of-range values
/// saturate.
pub fn leading_int(text: &str) -> i64 {
    let caps = match INT_PREFIX.captures(text) {
        Some(c) => c,
        None => return 0,
    };
    let negative = &caps[1] == "-";
    let digits = caps[2].trim_start_matches('0');

    let mut value: i64 = 0;
    for digit in digits.bytes() {
        let d = i64::from(digit - b'0');
        value = match value.checked_mul(10).and_then(|v| {
            if negative {
                v.checked_sub(d)
            } else {
                v.checked_add(d)
            }
        }) {
            Some(v) => v,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }
    value
}

/// Leading decimal float of `text` with C `atof` rules.
pub fn leading_float(text: &str) -> f64 {
    FLOAT_PREFIX
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub trait ToValue {
    fn to_value(&self, var_type: VarType) -> Value;
}

impl ToValue for str {
    fn to_value(&self, var_type: VarType) -> Value {
        match var_type {
            VarType::Int => Value::Int(leading_int(self)),
            VarType::Double => Value::Double(leading_float(self)),
            VarType::String => Value::String(self.to_string()),
        }
    }
}

impl ToValue for Literal {
    fn to_value(&self, var_type: VarType) -> Value {
        self.text().to_value(var_type)
    }
}

impl ToValue for Option<Literal> {
    fn to_value(&self, var_type: VarType) -> Value {
        match self {
            Some(literal) => literal.to_value(var_type),
            None => Value::zero(var_type),
        }
    }
}
