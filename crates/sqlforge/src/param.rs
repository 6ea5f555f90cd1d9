//! Named-parameter bookkeeping for one statement.
//!
//! A [`ParameterManager`] tracks the fully described bound parameters of a
//! single logical statement, plus a separate list of opaque dynamic
//! parameter bags for callers that hand over a pre-built value object
//! instead of enumerating fields.
//!
//! Names are normalized to the owning dialect's prefix convention before
//! storage, so `contains("p0")` and `contains("@p0")` are equivalent.

use crate::dialect::Dialect;
use crate::types::DbType;
use crate::value::SqlValue;
use serde::{Deserialize, Serialize};

/// Direction of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParamDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// A fully described bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParam {
    /// Name in the owning dialect's prefixed form (`@p0`, `:p0`).
    pub name: String,
    pub value: SqlValue,
    pub db_type: Option<DbType>,
    pub direction: ParamDirection,
    pub size: Option<i32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
}

impl SqlParam {
    /// Create an input parameter carrying only a value.
    pub fn new(name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            db_type: None,
            direction: ParamDirection::Input,
            size: None,
            precision: None,
            scale: None,
        }
    }

    /// Attach a generic type tag.
    pub fn with_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    /// Set the parameter direction.
    pub fn with_direction(mut self, direction: ParamDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the declared size.
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set numeric precision and scale.
    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }
}

/// An opaque dynamic parameter bag, forwarded to the executor untouched.
pub type ParamBag = serde_json::Value;

/// Tracks the named parameters and dynamic bags of one statement.
///
/// Per-statement and not for concurrent mutation; the supported reuse
/// mechanism across contexts is [`Clone`], which yields a fully isolated
/// copy.
#[derive(Debug, Clone)]
pub struct ParameterManager {
    dialect: &'static Dialect,
    counter: usize,
    params: Vec<SqlParam>,
    dynamic: Vec<ParamBag>,
}

impl ParameterManager {
    /// Create an empty manager bound to a dialect's prefix convention.
    pub fn new(dialect: &'static Dialect) -> Self {
        Self {
            dialect,
            counter: 0,
            params: Vec::new(),
            dynamic: Vec::new(),
        }
    }

    /// The dialect whose prefix convention this manager normalizes to.
    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Generate a name distinct from every name registered so far.
    ///
    /// Returns the prefixed form (`@p0`, `@p1`, ...). The counter only moves
    /// forward, so generated names never collide even after removals.
    pub fn generate_name(&mut self) -> String {
        loop {
            let name = self.dialect.param_token(&format!("p{}", self.counter));
            self.counter += 1;
            if !self.contains(&name) {
                return name;
            }
        }
    }

    /// Normalize a name to the dialect's prefixed form.
    ///
    /// Lookups and storage both go through this, making the whole surface
    /// prefix-insensitive.
    pub fn normalize_name(&self, name: &str) -> String {
        if name.starts_with(self.dialect.parameter_prefix) {
            name.to_string()
        } else {
            self.dialect.param_token(name)
        }
    }

    /// Register a fully described parameter.
    ///
    /// Re-adding an existing name overwrites the stored parameter in place,
    /// preserving its original position.
    pub fn add(&mut self, mut param: SqlParam) {
        param.name = self.normalize_name(&param.name);
        if let Some(existing) = self.params.iter_mut().find(|p| p.name == param.name) {
            *existing = param;
        } else {
            self.params.push(param);
        }
    }

    /// Register a plain input parameter by name and value.
    pub fn add_value(&mut self, name: &str, value: impl Into<SqlValue>) {
        self.add(SqlParam::new(name, value));
    }

    /// Generate a fresh name, register `value` under it, and return the name.
    pub fn bind(&mut self, value: impl Into<SqlValue>) -> String {
        let name = self.generate_name();
        self.add(SqlParam::new(name.clone(), value));
        name
    }

    /// Store an opaque parameter bag, kept apart from named parameters.
    pub fn add_dynamic(&mut self, bag: ParamBag) {
        self.dynamic.push(bag);
    }

    /// Whether a parameter with this name (prefixed or bare) is registered.
    pub fn contains(&self, name: &str) -> bool {
        let name = self.normalize_name(name);
        self.params.iter().any(|p| p.name == name)
    }

    /// Look up a parameter by name (prefixed or bare).
    pub fn get(&self, name: &str) -> Option<&SqlParam> {
        let name = self.normalize_name(name);
        self.params.iter().find(|p| p.name == name)
    }

    /// Look up a parameter's value by name (prefixed or bare).
    pub fn value_of(&self, name: &str) -> Option<&SqlValue> {
        self.get(name).map(|p| &p.value)
    }

    /// Read-only snapshot of the named parameters, in registration order.
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Read-only snapshot of the dynamic parameter bags.
    pub fn dynamic_params(&self) -> &[ParamBag] {
        &self.dynamic
    }

    /// Number of named parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.dynamic.is_empty()
    }

    /// Drop all named parameters and dynamic bags.
    pub fn clear(&mut self) {
        self.params.clear();
        self.dynamic.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> ParameterManager {
        ParameterManager::new(&Dialect::SQL_SERVER)
    }

    #[test]
    fn generated_names_are_distinct_and_prefixed() {
        let mut pm = manager();
        let a = pm.generate_name();
        let b = pm.generate_name();
        assert_eq!(a, "@p0");
        assert_eq!(b, "@p1");
        assert_ne!(a, b);
    }

    #[test]
    fn generate_skips_names_registered_by_hand() {
        let mut pm = manager();
        pm.add_value("p0", 1i64);
        let name = pm.generate_name();
        assert_eq!(name, "@p1");
    }

    #[test]
    fn oracle_prefix_convention() {
        let mut pm = ParameterManager::new(&Dialect::ORACLE);
        assert_eq!(pm.generate_name(), ":p0");
        assert_eq!(pm.normalize_name("x"), ":x");
        assert_eq!(pm.normalize_name(":x"), ":x");
    }

    #[test]
    fn lookup_is_prefix_insensitive() {
        let mut pm = manager();
        pm.add_value("p0", 42i64);
        assert!(pm.contains("p0"));
        assert!(pm.contains("@p0"));
        assert_eq!(pm.value_of("@p0"), Some(&SqlValue::Int(42)));
        assert_eq!(pm.value_of("p0"), Some(&SqlValue::Int(42)));
    }

    #[test]
    fn add_returns_same_value_and_type() {
        let mut pm = manager();
        pm.add(SqlParam::new("p0", 42i64).with_type(DbType::Int32));
        let p = pm.get("p0").unwrap();
        assert_eq!(p.value, SqlValue::Int(42));
        assert_eq!(p.db_type, Some(DbType::Int32));
        assert_eq!(p.direction, ParamDirection::Input);
    }

    // Pins the collision policy: re-adding an existing name overwrites in
    // place rather than rejecting or duplicating.
    #[test]
    fn readding_a_name_overwrites_in_place() {
        let mut pm = manager();
        pm.add_value("p0", 1i64);
        pm.add_value("p1", 2i64);
        pm.add_value("p0", 99i64);
        assert_eq!(pm.len(), 2);
        assert_eq!(pm.value_of("p0"), Some(&SqlValue::Int(99)));
        assert_eq!(pm.params()[0].name, "@p0");
        assert_eq!(pm.params()[1].name, "@p1");
    }

    #[test]
    fn clear_empties_both_lists() {
        let mut pm = manager();
        pm.add_value("p0", 1i64);
        pm.add_dynamic(json!({"id": 7}));
        pm.clear();
        assert!(pm.params().is_empty());
        assert!(pm.dynamic_params().is_empty());
        assert!(pm.is_empty());
    }

    #[test]
    fn dynamic_bags_live_in_a_separate_list() {
        let mut pm = manager();
        pm.add_value("p0", 1i64);
        pm.add_dynamic(json!({"status": "active"}));
        assert_eq!(pm.params().len(), 1);
        assert_eq!(pm.dynamic_params().len(), 1);
        assert_eq!(pm.dynamic_params()[0]["status"], "active");
    }

    #[test]
    fn clone_is_isolated_from_original() {
        let mut pm = manager();
        pm.add_value("p0", 1i64);
        pm.add_dynamic(json!({"a": 1}));

        let mut copy = pm.clone();
        copy.add_value("p1", 2i64);
        copy.add_value("p0", 100i64);
        copy.add_dynamic(json!({"b": 2}));

        assert_eq!(pm.params().len(), 1);
        assert_eq!(pm.value_of("p0"), Some(&SqlValue::Int(1)));
        assert_eq!(pm.dynamic_params().len(), 1);
        assert_eq!(copy.params().len(), 2);
    }

    #[test]
    fn bind_registers_under_a_fresh_name() {
        let mut pm = manager();
        let name = pm.bind("alice");
        assert_eq!(name, "@p0");
        assert_eq!(pm.value_of(&name), Some(&SqlValue::Text("alice".into())));
    }
}
