// src/types.rs
//! Interned types using TypeId handles for O(1) equality.
//!
//! The arena is the canonical type representation for the front end:
//!
//! - `TypeId`: u32 handle to an interned type (Copy, trivial Eq/Hash)
//! - `TypeArena`: per-compilation storage with automatic deduplication
//! - every type is a factory for canonical abstract values
//!   (uninitialized / default / worst-case)
//!
//! Concurrency contract: interning requires `&mut TypeArena`, so all type
//! construction happens in a single-writer setup phase; afterwards the arena
//! is shared immutably (`&TypeArena` is `Send + Sync`) and handles stay valid
//! for its whole lifetime. Entries are never removed.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::domain::numeric::{NumericSlot, NumericValueSet, NumericValues};
use crate::domain::range::Range;
use crate::domain::structural::{StructValueSet, ValueSet, ValueSetAndType};
use crate::num::Scalar;

/// The ten numeric representations the value domain understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    // Signed integers
    I8,
    I16,
    I32,
    I64,
    // Unsigned integers
    U8,
    U16,
    U32,
    U64,
    // Floating point
    F32,
    F64,
}

impl NumericKind {
    pub const ALL: [NumericKind; 10] = [
        NumericKind::I8,
        NumericKind::I16,
        NumericKind::I32,
        NumericKind::I64,
        NumericKind::U8,
        NumericKind::U16,
        NumericKind::U32,
        NumericKind::U64,
        NumericKind::F32,
        NumericKind::F64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericKind::I8 => "i8",
            NumericKind::I16 => "i16",
            NumericKind::I32 => "i32",
            NumericKind::I64 => "i64",
            NumericKind::U8 => "u8",
            NumericKind::U16 => "u16",
            NumericKind::U32 => "u32",
            NumericKind::U64 => "u64",
            NumericKind::F32 => "f32",
            NumericKind::F64 => "f64",
        }
    }

    pub fn bit_width(self) -> u8 {
        match self {
            NumericKind::I8 | NumericKind::U8 => 8,
            NumericKind::I16 | NumericKind::U16 => 16,
            NumericKind::I32 | NumericKind::U32 | NumericKind::F32 => 32,
            NumericKind::I64 | NumericKind::U64 | NumericKind::F64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            NumericKind::I8 | NumericKind::I16 | NumericKind::I32 | NumericKind::I64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            NumericKind::U8 | NumericKind::U16 | NumericKind::U32 | NumericKind::U64
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }
}

/// Concrete type identity in the [`TypeArena`].
///
/// Numeric kinds are pre-interned at reserved indices, so a numeric TypeId
/// can be produced without touching the arena. Identity equality on TypeId
/// implies structural equality: kind equality for numeric types, ordered
/// field-sequence equality for struct types.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeId(u32);

impl TypeId {
    // Reserved TypeIds, guaranteed by TypeArena::new() to be interned at
    // these indices.
    pub const I8: TypeId = TypeId(0);
    pub const I16: TypeId = TypeId(1);
    pub const I32: TypeId = TypeId(2);
    pub const I64: TypeId = TypeId(3);
    pub const U8: TypeId = TypeId(4);
    pub const U16: TypeId = TypeId(5);
    pub const U32: TypeId = TypeId(6);
    pub const U64: TypeId = TypeId(7);
    pub const F32: TypeId = TypeId(8);
    pub const F64: TypeId = TypeId(9);

    /// First non-reserved index (struct types land here and up).
    pub const FIRST_DYNAMIC: u32 = 10;

    /// Raw index, for debugging.
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

/// SmallVec for struct field lists - inline up to 4 fields.
pub type FieldVec = SmallVec<[TypeId; 4]>;

/// A type: either one of the ten numeric kinds, or an unnamed struct given
/// by its ordered field types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Numeric(NumericKind),
    Struct(FieldVec),
}

/// Per-compilation type arena with automatic interning.
pub struct TypeArena {
    /// Interned types, indexed by TypeId. Append-only.
    types: Vec<Type>,
    /// Deduplication map.
    intern_map: HashMap<Type, TypeId>,
}

impl std::fmt::Debug for TypeArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeArena")
            .field("types_count", &self.types.len())
            .finish_non_exhaustive()
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    /// Create an arena with the ten numeric kinds pre-interned at their
    /// reserved indices.
    pub fn new() -> Self {
        let mut arena = TypeArena {
            types: Vec::new(),
            intern_map: HashMap::new(),
        };
        for kind in NumericKind::ALL {
            let id = arena.intern(Type::Numeric(kind));
            debug_assert_eq!(id, arena.numeric(kind));
        }
        arena
    }

    fn intern(&mut self, ty: Type) -> TypeId {
        let next_id = TypeId(self.types.len() as u32);
        *self.intern_map.entry(ty.clone()).or_insert_with(|| {
            self.types.push(ty);
            next_id
        })
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ------------------------------------------------------------------
    // Numeric accessors - O(1), no arena lookup needed
    // ------------------------------------------------------------------

    pub fn i8(&self) -> TypeId {
        TypeId::I8
    }
    pub fn i16(&self) -> TypeId {
        TypeId::I16
    }
    pub fn i32(&self) -> TypeId {
        TypeId::I32
    }
    pub fn i64(&self) -> TypeId {
        TypeId::I64
    }
    pub fn u8(&self) -> TypeId {
        TypeId::U8
    }
    pub fn u16(&self) -> TypeId {
        TypeId::U16
    }
    pub fn u32(&self) -> TypeId {
        TypeId::U32
    }
    pub fn u64(&self) -> TypeId {
        TypeId::U64
    }
    pub fn f32(&self) -> TypeId {
        TypeId::F32
    }
    pub fn f64(&self) -> TypeId {
        TypeId::F64
    }

    pub fn numeric(&self, kind: NumericKind) -> TypeId {
        match kind {
            NumericKind::I8 => TypeId::I8,
            NumericKind::I16 => TypeId::I16,
            NumericKind::I32 => TypeId::I32,
            NumericKind::I64 => TypeId::I64,
            NumericKind::U8 => TypeId::U8,
            NumericKind::U16 => TypeId::U16,
            NumericKind::U32 => TypeId::U32,
            NumericKind::U64 => TypeId::U64,
            NumericKind::F32 => TypeId::F32,
            NumericKind::F64 => TypeId::F64,
        }
    }

    /// Structurally intern an unnamed struct type: the same ordered field
    /// sequence always yields the same TypeId.
    pub fn struct_of(&mut self, fields: impl IntoIterator<Item = TypeId>) -> TypeId {
        let fields: FieldVec = fields.into_iter().collect();
        debug_assert!(fields.iter().all(|f| (f.0 as usize) < self.types.len()));
        let before = self.types.len();
        let id = self.intern(Type::Struct(fields));
        if self.types.len() > before {
            tracing::debug!(id = id.index(), "interned new struct type");
        }
        id
    }

    // ------------------------------------------------------------------
    // Value factories
    // ------------------------------------------------------------------

    /// An abstract value with no facts recorded (`initialized` false on
    /// every numeric leaf).
    pub fn uninitialized_value(&self, ty: TypeId) -> ValueSetAndType {
        self.manufacture(ty, Seed::Uninitialized)
    }

    /// The abstract value of a default-initialized location: `{0}` on every
    /// numeric leaf.
    pub fn default_value(&self, ty: TypeId) -> ValueSetAndType {
        self.manufacture(ty, Seed::Default)
    }

    /// The abstract value when nothing is known: the full representable
    /// domain (step 1) on every numeric leaf.
    pub fn worst_case_value(&self, ty: TypeId) -> ValueSetAndType {
        self.manufacture(ty, Seed::WorstCase)
    }

    fn manufacture(&self, ty: TypeId, seed: Seed) -> ValueSetAndType {
        let values = match self.get(ty) {
            Type::Numeric(kind) => ValueSet::Numeric(numeric_values(*kind, seed)),
            Type::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|&field| self.manufacture(field, seed))
                    .collect();
                ValueSet::Struct(StructValueSet::new(fields))
            }
        };
        ValueSetAndType::new(ty, values)
    }
}

#[derive(Clone, Copy)]
enum Seed {
    Uninitialized,
    Default,
    WorstCase,
}

fn seeded_set<T: Scalar>(seed: Seed) -> NumericValueSet<T> {
    let mut set = NumericValueSet::new();
    match seed {
        Seed::Uninitialized => {}
        Seed::Default => {
            set.add_value(T::ZERO);
        }
        Seed::WorstCase => {
            set.add_ranged(Range::full());
        }
    }
    set
}

fn numeric_values(kind: NumericKind, seed: Seed) -> NumericValues {
    match kind {
        NumericKind::I8 => NumericSlot::wrap(seeded_set::<i8>(seed)),
        NumericKind::I16 => NumericSlot::wrap(seeded_set::<i16>(seed)),
        NumericKind::I32 => NumericSlot::wrap(seeded_set::<i32>(seed)),
        NumericKind::I64 => NumericSlot::wrap(seeded_set::<i64>(seed)),
        NumericKind::U8 => NumericSlot::wrap(seeded_set::<u8>(seed)),
        NumericKind::U16 => NumericSlot::wrap(seeded_set::<u16>(seed)),
        NumericKind::U32 => NumericSlot::wrap(seeded_set::<u32>(seed)),
        NumericKind::U64 => NumericSlot::wrap(seeded_set::<u64>(seed)),
        NumericKind::F32 => NumericSlot::wrap(seeded_set::<f32>(seed)),
        NumericKind::F64 => NumericSlot::wrap(seeded_set::<f64>(seed)),
    }
}
