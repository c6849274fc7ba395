//! Destination descriptions.
//!
//! Schema nodes never inspect destination memory by themselves. Instead each
//! destination type describes itself once through [`Target::type_info`]:
//! what kind of value it holds and, for containers, typed accessor closures
//! that reach into it. Nodes check the description in `prepare` and keep the
//! accessors they need, so parsing only performs `Any` downcasts to the exact
//! types those closures were created for.
//!
//! Structs describe their fields with [`StructInfo`], either by hand or with
//! [`target_struct!`](crate::target_struct):
//!
//! ```
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//!     age: i64,
//!     nickname: Option<String>,
//! }
//!
//! jsonv::target_struct!(Person { name, age, nickname as "nick" });
//! ```

use std::{
    any::{Any, TypeId, type_name},
    fmt,
    marker::PhantomData,
    sync::Arc,
};

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;

/// Type-erased projection from a container to one of its parts. Returns
/// `None` when handed a value of the wrong type.
pub type Accessor = Arc<dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync>;

fn accessor<F>(f: F) -> Accessor
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn compose(outer: &Accessor, inner: &Accessor) -> Accessor {
    let (outer, inner) = (Arc::clone(outer), Arc::clone(inner));
    accessor(move |dest| inner(outer(dest)?))
}

/// A type that values can be decoded into.
pub trait Target: Any {
    fn type_info() -> TypeInfo;
}

/// Custom decoding from a raw JSON value.
///
/// Types implementing this are decoded by
/// [`unmarshaler`](crate::types::unmarshaler) nodes, which hand over the
/// complete value with insignificant whitespace removed. An error becomes a
/// validation record at the value's path.
pub trait UnmarshalJson {
    /// # Errors
    ///
    /// Any error is reported as a validation failure of this value.
    fn unmarshal_json(&mut self, raw: &[u8])
    -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// `None` when `dest` is not the type the function was created for.
pub(crate) type UnmarshalFn = fn(&mut dyn Any, &[u8]) -> Option<Result<(), String>>;

fn unmarshal_erased<T: UnmarshalJson + Any>(
    dest: &mut dyn Any,
    raw: &[u8],
) -> Option<Result<(), String>> {
    let dest = dest.downcast_mut::<T>()?;
    Some(dest.unmarshal_json(raw).map_err(|e| e.to_string()))
}

/// Self-description of a destination type.
#[derive(Clone)]
pub struct TypeInfo {
    type_id: TypeId,
    type_name: &'static str,
    kind: Kind,
    unmarshal: Option<UnmarshalFn>,
}

#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Kind {
    Bool,
    Int { bits: u32, signed: bool },
    Float { bits: u32 },
    String,
    Date,
    DateTime,
    Struct(StructInfo),
    /// `Vec<T>`
    Slice(SliceInfo),
    /// `Option<T>`
    Optional(OptionalInfo),
    /// A type with no structure visible to schema nodes.
    Opaque,
}

impl Kind {
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int { .. } => "integer",
            Kind::Float { .. } => "float",
            Kind::String => "string",
            Kind::Date => "date",
            Kind::DateTime => "date-time",
            Kind::Struct(_) => "struct",
            Kind::Slice(_) => "slice",
            Kind::Optional(_) => "optional",
            Kind::Opaque => "opaque",
        }
    }
}

impl TypeInfo {
    fn new<T: Any>(kind: Kind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            kind,
            unmarshal: None,
        }
    }

    #[must_use]
    pub fn of<T: Target>() -> Self {
        T::type_info()
    }

    /// Describes a struct by its fields.
    #[must_use]
    pub fn structure<T: Any>(fields: StructInfo) -> Self {
        Self::new::<T>(Kind::Struct(fields))
    }

    /// Describes a type that only an [`UnmarshalJson`] implementation can
    /// decode.
    #[must_use]
    pub fn unmarshaler<T: UnmarshalJson + Any>() -> Self {
        Self::new::<T>(Kind::Opaque).with_unmarshaler::<T>()
    }

    /// Adds an [`UnmarshalJson`] capability to a description of `T`.
    #[must_use]
    pub fn with_unmarshaler<T: UnmarshalJson + Any>(mut self) -> Self {
        debug_assert_eq!(self.type_id, TypeId::of::<T>(), "unmarshaler for another type");
        self.unmarshal = Some(unmarshal_erased::<T>);
        self
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub(crate) fn unmarshal_fn(&self) -> Option<UnmarshalFn> {
        self.unmarshal
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind.describe())
            .field("unmarshal", &self.unmarshal.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Structs

#[derive(Clone)]
pub struct FieldInfo {
    ident: &'static str,
    tag: Option<&'static str>,
    ty: fn() -> TypeInfo,
    access: Accessor,
    embedded: bool,
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("ident", &self.ident)
            .field("tag", &self.tag)
            .field("embedded", &self.embedded)
            .finish_non_exhaustive()
    }
}

impl FieldInfo {
    /// The name JSON properties are matched against.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.tag.unwrap_or(self.ident)
    }
}

fn erase<S, F, G>(get: G) -> Accessor
where
    S: Any,
    F: Any,
    G: Fn(&mut S) -> &mut F + Send + Sync + 'static,
{
    accessor(move |dest| dest.downcast_mut::<S>().map(|s| get(s) as &mut dyn Any))
}

/// Field list of a struct destination.
///
/// Field names default to the identifier; a tag renames the field, and the
/// tag `"-"` hides it. Embedded structs contribute their own fields as if
/// they were declared on the outer struct.
#[derive(Clone, Debug, Default)]
pub struct StructInfo {
    fields: Vec<FieldInfo>,
}

impl StructInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field<S, F, G>(self, ident: &'static str, get: G) -> Self
    where
        S: Any,
        F: Target,
        G: Fn(&mut S) -> &mut F + Send + Sync + 'static,
    {
        self.field_with(ident, None, get)
    }

    #[must_use]
    pub fn tagged<S, F, G>(self, ident: &'static str, tag: &'static str, get: G) -> Self
    where
        S: Any,
        F: Target,
        G: Fn(&mut S) -> &mut F + Send + Sync + 'static,
    {
        self.field_with(ident, Some(tag), get)
    }

    #[must_use]
    pub fn field_with<S, F, G>(mut self, ident: &'static str, tag: Option<&'static str>, get: G) -> Self
    where
        S: Any,
        F: Target,
        G: Fn(&mut S) -> &mut F + Send + Sync + 'static,
    {
        self.fields.push(FieldInfo {
            ident,
            tag,
            ty: F::type_info,
            access: erase(get),
            embedded: false,
        });
        self
    }

    /// Flattens the fields of an embedded struct into this one.
    #[must_use]
    pub fn embed<S, E, G>(mut self, ident: &'static str, get: G) -> Self
    where
        S: Any,
        E: Target,
        G: Fn(&mut S) -> &mut E + Send + Sync + 'static,
    {
        self.fields.push(FieldInfo {
            ident,
            tag: None,
            ty: E::type_info,
            access: erase(get),
            embedded: true,
        });
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }
}

/// A field after embedding and name conflicts are resolved.
#[derive(Clone)]
pub(crate) struct ResolvedField {
    pub name: &'static str,
    pub ty: TypeInfo,
    pub access: Accessor,
}

struct Candidate {
    name: &'static str,
    depth: usize,
    tagged: bool,
    ty: TypeInfo,
    access: Accessor,
}

fn collect(
    info: &StructInfo,
    depth: usize,
    via: Option<&Accessor>,
    visiting: &mut Vec<TypeId>,
    out: &mut Vec<Candidate>,
) {
    for field in &info.fields {
        if field.tag == Some("-") {
            continue;
        }
        let access = match via {
            Some(outer) => compose(outer, &field.access),
            None => Arc::clone(&field.access),
        };
        let ty = (field.ty)();
        if field.embedded {
            if let Kind::Struct(inner) = ty.kind() {
                if !visiting.contains(&ty.type_id()) {
                    visiting.push(ty.type_id());
                    collect(inner, depth + 1, Some(&access), visiting, out);
                    visiting.pop();
                }
                continue;
            }
        }
        out.push(Candidate {
            name: field.name(),
            depth,
            tagged: field.tag.is_some(),
            ty,
            access,
        });
    }
}

/// Flattens the fields of `info` (a description of the struct `root`).
///
/// For each name the shallowest field wins. Among fields at the same depth a
/// single tagged one wins; any other tie hides the name.
pub(crate) fn resolve_fields(root: TypeId, info: &StructInfo) -> Vec<ResolvedField> {
    let mut candidates = Vec::new();
    collect(info, 0, None, &mut vec![root], &mut candidates);

    let mut names: Vec<&'static str> = Vec::new();
    for c in &candidates {
        if !names.contains(&c.name) {
            names.push(c.name);
        }
    }

    names
        .into_iter()
        .filter_map(|name| {
            let depth = candidates
                .iter()
                .filter(|c| c.name == name)
                .map(|c| c.depth)
                .min()?;
            let shallowest: Vec<&Candidate> = candidates
                .iter()
                .filter(|c| c.name == name && c.depth == depth)
                .collect();
            let winner = match shallowest.as_slice() {
                [only] => *only,
                _ => {
                    let tagged: Vec<&Candidate> =
                        shallowest.iter().copied().filter(|c| c.tagged).collect();
                    if let [only] = tagged.as_slice() {
                        *only
                    } else {
                        debug!("field `{name}` is ambiguous at depth {depth}, ignoring it");
                        return None;
                    }
                }
            };
            Some(ResolvedField {
                name,
                ty: winner.ty.clone(),
                access: Arc::clone(&winner.access),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Slices and optionals

pub(crate) trait SliceAccess: Send + Sync {
    /// Empties the vector. `false` if `dest` is not the expected vector.
    fn clear(&self, dest: &mut dyn Any) -> bool;
    /// Appends a default element and returns it.
    fn push_default<'a>(&self, dest: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
    fn len(&self, dest: &dyn Any) -> Option<usize>;
}

struct VecAccess<T>(PhantomData<fn() -> T>);

impl<T: Default + Any> SliceAccess for VecAccess<T> {
    fn clear(&self, dest: &mut dyn Any) -> bool {
        dest.downcast_mut::<Vec<T>>().map(Vec::clear).is_some()
    }

    fn push_default<'a>(&self, dest: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let items = dest.downcast_mut::<Vec<T>>()?;
        if items.len() == items.capacity() {
            let grown = (items.capacity() + items.capacity() / 2).max(4);
            items.reserve_exact(grown - items.len());
        }
        items.push(T::default());
        items.last_mut().map(|item| item as &mut dyn Any)
    }

    fn len(&self, dest: &dyn Any) -> Option<usize> {
        dest.downcast_ref::<Vec<T>>().map(Vec::len)
    }
}

#[derive(Clone)]
pub struct SliceInfo {
    element: fn() -> TypeInfo,
    access: Arc<dyn SliceAccess>,
}

impl SliceInfo {
    #[must_use]
    pub fn element(&self) -> TypeInfo {
        (self.element)()
    }

    pub(crate) fn access(&self) -> Arc<dyn SliceAccess> {
        Arc::clone(&self.access)
    }
}

impl fmt::Debug for SliceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceInfo").finish_non_exhaustive()
    }
}

pub(crate) trait OptionAccess: Send + Sync {
    /// Returns the wrapped value, inserting a default one if absent.
    fn get_or_insert<'a>(&self, dest: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
    fn clear(&self, dest: &mut dyn Any) -> bool;
}

struct OptionSlot<T>(PhantomData<fn() -> T>);

impl<T: Default + Any> OptionAccess for OptionSlot<T> {
    fn get_or_insert<'a>(&self, dest: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let slot = dest.downcast_mut::<Option<T>>()?;
        Some(slot.get_or_insert_with(T::default) as &mut dyn Any)
    }

    fn clear(&self, dest: &mut dyn Any) -> bool {
        dest.downcast_mut::<Option<T>>()
            .map(|slot| *slot = None)
            .is_some()
    }
}

#[derive(Clone)]
pub struct OptionalInfo {
    inner: fn() -> TypeInfo,
    access: Arc<dyn OptionAccess>,
}

impl OptionalInfo {
    #[must_use]
    pub fn inner(&self) -> TypeInfo {
        (self.inner)()
    }

    pub(crate) fn access(&self) -> Arc<dyn OptionAccess> {
        Arc::clone(&self.access)
    }
}

impl fmt::Debug for OptionalInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalInfo").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Built-in targets

impl Target for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<bool>(Kind::Bool)
    }
}

macro_rules! impl_int_target {
    ($($t:ty),*) => {
        $(
            impl Target for $t {
                fn type_info() -> TypeInfo {
                    TypeInfo::new::<$t>(Kind::Int { bits: <$t>::BITS, signed: <$t>::MIN != 0 })
                }
            }
        )*
    };
}

impl_int_target!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Target for f32 {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<f32>(Kind::Float { bits: 32 })
    }
}

impl Target for f64 {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<f64>(Kind::Float { bits: 64 })
    }
}

impl Target for String {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<String>(Kind::String)
    }
}

impl Target for NaiveDate {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<NaiveDate>(Kind::Date)
    }
}

impl Target for DateTime<Utc> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<DateTime<Utc>>(Kind::DateTime)
    }
}

impl<T: Target + Default> Target for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Vec<T>>(Kind::Slice(SliceInfo {
            element: T::type_info,
            access: Arc::new(VecAccess::<T>(PhantomData)),
        }))
    }
}

impl<T: Target + Default> Target for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Option<T>>(Kind::Optional(OptionalInfo {
            inner: T::type_info,
            access: Arc::new(OptionSlot::<T>(PhantomData)),
        }))
    }
}

/// Implements [`Target`] for a struct by listing its fields.
///
/// A field may be renamed with `as "name"`. Embedded structs need
/// [`StructInfo::embed`] and a hand-written implementation.
///
/// ```
/// #[derive(Default)]
/// struct Login {
///     user: String,
///     remember_me: bool,
/// }
///
/// jsonv::target_struct!(Login { user, remember_me as "rememberMe" });
/// ```
#[macro_export]
macro_rules! target_struct {
    (@tag) => { ::core::option::Option::None };
    (@tag $tag:literal) => { ::core::option::Option::Some($tag) };
    ($ty:ty { $($field:ident $(as $tag:literal)?),* $(,)? }) => {
        impl $crate::target::Target for $ty {
            fn type_info() -> $crate::target::TypeInfo {
                $crate::target::TypeInfo::structure::<$ty>(
                    $crate::target::StructInfo::new()
                        $(.field_with(
                            ::core::stringify!($field),
                            $crate::target_struct!(@tag $($tag)?),
                            |target: &mut $ty| &mut target.$field,
                        ))*
                )
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Audit {
        created: String,
        id: i64,
    }

    #[derive(Default)]
    struct Named {
        id: String,
    }

    #[derive(Default)]
    struct Record {
        name: String,
        audit: Audit,
        named: Named,
        secret: String,
        label: String,
    }

    impl Target for Audit {
        fn type_info() -> TypeInfo {
            TypeInfo::structure::<Self>(
                StructInfo::new()
                    .field("created", |a: &mut Audit| &mut a.created)
                    .field("id", |a: &mut Audit| &mut a.id),
            )
        }
    }

    impl Target for Named {
        fn type_info() -> TypeInfo {
            TypeInfo::structure::<Self>(StructInfo::new().field("id", |n: &mut Named| &mut n.id))
        }
    }

    impl Target for Record {
        fn type_info() -> TypeInfo {
            TypeInfo::structure::<Self>(
                StructInfo::new()
                    .field("name", |r: &mut Record| &mut r.name)
                    .embed("audit", |r: &mut Record| &mut r.audit)
                    .embed("named", |r: &mut Record| &mut r.named)
                    .tagged("secret", "-", |r: &mut Record| &mut r.secret)
                    .tagged("label", "created", |r: &mut Record| &mut r.label),
            )
        }
    }

    fn resolved<T: Target>() -> Vec<ResolvedField> {
        let info = T::type_info();
        let Kind::Struct(fields) = info.kind() else {
            panic!("not a struct");
        };
        resolve_fields(info.type_id(), fields)
    }

    #[test]
    fn flattening_and_conflicts() {
        let fields = resolved::<Record>();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        // `id` is declared by two embedded structs at the same depth and
        // disappears; the outer `created` tag shadows `Audit::created`.
        assert_eq!(names, vec!["name", "created"]);
    }

    #[test]
    fn accessors_reach_embedded_fields() {
        let fields = resolved::<Record>();
        let created = fields.iter().find(|f| f.name == "created").unwrap();
        let mut record = Record::default();
        let slot = (created.access)(&mut record).unwrap();
        *slot.downcast_mut::<String>().unwrap() = "outer".to_string();
        assert_eq!(record.label, "outer");
        assert_eq!(record.audit.created, "");
    }

    #[test]
    fn accessor_rejects_other_types() {
        let fields = resolved::<Record>();
        assert!((fields[0].access)(&mut 5_i32).is_none());
    }

    #[test]
    fn vec_growth_policy() {
        let info = Vec::<i32>::type_info();
        let Kind::Slice(slice) = info.kind() else {
            panic!("not a slice");
        };
        let access = slice.access();
        let mut items: Vec<i32> = Vec::new();
        let mut caps = Vec::new();
        for _ in 0..7 {
            access.push_default(&mut items).unwrap();
            caps.push(items.capacity());
        }
        assert_eq!(caps, vec![4, 4, 4, 4, 6, 6, 9]);
        assert_eq!(access.len(&items), Some(7));
        assert!(access.clear(&mut items));
        assert!(items.is_empty());
    }

    #[test]
    fn integer_kinds() {
        assert!(matches!(
            u16::type_info().kind(),
            Kind::Int { bits: 16, signed: false }
        ));
        assert!(matches!(
            i64::type_info().kind(),
            Kind::Int { bits: 64, signed: true }
        ));
    }
}
