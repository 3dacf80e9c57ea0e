use std::collections::HashMap;
use std::fmt;

use super::debug::RuntimeError;
use super::parser::VarType;
use crate::config::DuplicatePolicy;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    String(String),
    Double(f64),
}

impl Value {
    pub fn zero(var_type: VarType) -> Self {
        match var_type {
            VarType::Int => Value::Int(0),
            VarType::String => Value::String(String::new()),
            VarType::Double => Value::Double(0.0),
        }
    }

    pub fn var_type(&self) -> VarType {
        match self {
            Value::Int(_) => VarType::Int,
            Value::String(_) => VarType::String,
            Value::Double(_) => VarType::Double,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            &Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{}", s),
            Value::Double(d) => write!(f, "{}", d),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub var_type: VarType,
    pub value: Value,
}

impl Variable {
    pub fn new(name: String, value: Value) -> Self {
        Self {
            name,
            var_type: value.var_type(),
            value,
        }
    }
}

/// Variables of one run, in declaration order.
///
/// `index` maps a name to the entry lookups resolve to. Under
/// `DuplicatePolicy::KeepFirst` that is the first entry with the name even
/// when later ones were appended.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
    capacity: usize,
    policy: DuplicatePolicy,
}

impl SymbolTable {
    pub fn new(capacity: usize, policy: DuplicatePolicy) -> Self {
        Self {
            variables: Vec::new(),
            index: HashMap::new(),
            capacity,
            policy,
        }
    }

    pub fn declare(&mut self, variable: Variable) -> Result<(), RuntimeError> {
        if let Some(&existing) = self.index.get(&variable.name) {
            match self.policy {
                DuplicatePolicy::KeepFirst => (),
                DuplicatePolicy::Overwrite => {
                    self.variables[existing] = variable;
                    return Ok(());
                }
                DuplicatePolicy::Reject => {
                    return Err(RuntimeError::DuplicateVariable(variable.name))
                }
            }
        }

        if self.variables.len() >= self.capacity {
            return Err(RuntimeError::VariableLimitExceeded {
                name: variable.name,
                max: self.capacity,
            });
        }

        self.index
            .entry(variable.name.clone())
            .or_insert(self.variables.len());
        self.variables.push(variable);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    /// Every entry carrying `name`, oldest first.
    pub fn entries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Variable> {
        self.variables.iter().filter(move |v| v.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
