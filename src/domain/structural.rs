// src/domain/structural.rs
//! Aggregate abstract values: per-field value-sets composed in field order.

use std::fmt;

use crate::domain::numeric::NumericValues;
use crate::domain::pad;
use crate::errors::DomainError;
use crate::types::TypeId;

/// The closed union of abstract values a storage location can carry.
#[derive(Debug, Clone)]
pub enum ValueSet {
    Numeric(NumericValues),
    Struct(StructValueSet),
}

impl ValueSet {
    /// Whether any fact has been recorded. A struct is initialized when all
    /// of its fields are.
    pub fn is_initialized(&self) -> bool {
        match self {
            ValueSet::Numeric(values) => values.is_initialized(),
            ValueSet::Struct(fields) => fields.is_initialized(),
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericValues> {
        match self {
            ValueSet::Numeric(values) => Some(values),
            ValueSet::Struct(_) => None,
        }
    }

    pub fn as_numeric_mut(&mut self) -> Option<&mut NumericValues> {
        match self {
            ValueSet::Numeric(values) => Some(values),
            ValueSet::Struct(_) => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValueSet> {
        match self {
            ValueSet::Numeric(_) => None,
            ValueSet::Struct(fields) => Some(fields),
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValueSet> {
        match self {
            ValueSet::Numeric(_) => None,
            ValueSet::Struct(fields) => Some(fields),
        }
    }

    /// Human-readable rendering. The first line carries no leading
    /// indentation (the caller places the prefix); continuation lines are
    /// indented relative to `indent`.
    pub fn render(&self, indent: usize) -> String {
        match self {
            ValueSet::Numeric(values) => values.render(indent),
            ValueSet::Struct(fields) => fields.render(indent),
        }
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

/// A type handle paired with the exclusively-owned abstract value it
/// manufactured. The handle stays valid for the lifetime of the arena that
/// issued it.
#[derive(Debug, Clone)]
pub struct ValueSetAndType {
    ty: TypeId,
    values: ValueSet,
}

impl ValueSetAndType {
    pub(crate) fn new(ty: TypeId, values: ValueSet) -> Self {
        ValueSetAndType { ty, values }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn values(&self) -> &ValueSet {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ValueSet {
        &mut self.values
    }
}

/// Ordered per-field abstract values for an unnamed struct type.
///
/// The shape is fixed at construction (one entry per field, in the field
/// order of the originating struct type); only the numeric leaves are
/// narrowed afterwards, by analysis code reaching through
/// [`StructValueSet::value_at_mut`].
#[derive(Debug, Clone)]
pub struct StructValueSet {
    fields: Vec<ValueSetAndType>,
}

impl StructValueSet {
    pub(crate) fn new(fields: Vec<ValueSetAndType>) -> Self {
        StructValueSet { fields }
    }

    pub fn value_count(&self) -> usize {
        self.fields.len()
    }

    pub fn value_at(&self, index: usize) -> Result<&ValueSetAndType, DomainError> {
        self.fields.get(index).ok_or(DomainError::IndexOutOfBounds {
            index,
            count: self.fields.len(),
        })
    }

    pub fn value_at_mut(&mut self, index: usize) -> Result<&mut ValueSetAndType, DomainError> {
        let count = self.fields.len();
        self.fields
            .get_mut(index)
            .ok_or(DomainError::IndexOutOfBounds { index, count })
    }

    pub fn is_initialized(&self) -> bool {
        self.fields.iter().all(|f| f.values().is_initialized())
    }

    pub fn render(&self, indent: usize) -> String {
        if self.fields.is_empty() {
            return "{}".to_string();
        }
        let mut out = String::from("{\n");
        for (i, field) in self.fields.iter().enumerate() {
            pad(&mut out, indent + 1);
            out.push_str(&format!("[field {i}]: "));
            out.push_str(&field.values().render(indent + 1));
            out.push('\n');
        }
        pad(&mut out, indent);
        out.push('}');
        out
    }
}

impl fmt::Display for StructValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}
