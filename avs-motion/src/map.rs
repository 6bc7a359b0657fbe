//! Argument maps passed to filter functions.

use thiserror::Error;

use crate::node::Node;

/// The error type for `Map` operations.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    #[error("The requested key wasn't found in the map")]
    KeyNotFound,
    #[error("The given/requested value type doesn't match the type of the property")]
    WrongValueType,
}

/// A specialized `Result` type for `Map` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
enum Value {
    Int(i64),
    Data(Vec<u8>),
    Node(Node),
}

/// An ordered map of argument names to values.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn get_value(&self, key: &str) -> Result<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
            .ok_or(Error::KeyNotFound)
    }

    fn set_value(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, old)) => *old = value,
            None => self.entries.push((key.to_owned(), value)),
        }
    }

    /// Deletes the given key.
    #[inline]
    pub fn delete_key(&mut self, key: &str) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|(k, _)| k == key)
            .ok_or(Error::KeyNotFound)?;
        self.entries.remove(index);
        Ok(())
    }

    /// Retrieves an integer from a map.
    #[inline]
    pub fn get_int(&self, key: &str) -> Result<i64> {
        match self.get_value(key)? {
            Value::Int(x) => Ok(*x),
            _ => Err(Error::WrongValueType),
        }
    }

    /// Retrieves a data value from a map.
    #[inline]
    pub fn get_data(&self, key: &str) -> Result<&[u8]> {
        match self.get_value(key)? {
            Value::Data(x) => Ok(x),
            _ => Err(Error::WrongValueType),
        }
    }

    /// Retrieves a node from a map.
    #[inline]
    pub fn get_node(&self, key: &str) -> Result<Node> {
        match self.get_value(key)? {
            Value::Node(x) => Ok(x.clone()),
            _ => Err(Error::WrongValueType),
        }
    }

    /// Sets a property value to an integer.
    #[inline]
    pub fn set_int(&mut self, key: &str, x: i64) {
        self.set_value(key, Value::Int(x));
    }

    /// Sets a property value to a data value.
    #[inline]
    pub fn set_data(&mut self, key: &str, x: &[u8]) {
        self.set_value(key, Value::Data(x.to_vec()));
    }

    /// Sets a property value to a node.
    #[inline]
    pub fn set_node(&mut self, key: &str, x: &Node) {
        self.set_value(key, Value::Node(x.clone()));
    }
}
