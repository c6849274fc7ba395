use std::fmt;

/// One step from a container to a child value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathItem<'a> {
    /// A property of an object.
    Key(&'a str),
    /// An element of an array.
    Index(usize),
}

/// Location of the value being decoded.
///
/// Paths are built on the stack while descending and only rendered when a
/// validation record is written, so well-formed documents never pay for
/// string formatting. The rendering is slash-delimited: `/` for the root,
/// `/name` for a property and `index/` for array elements, giving paths like
/// `/items/0/name` and `/1/`.
#[derive(Clone, Copy, Debug)]
pub enum Path<'a> {
    Root,
    Child(&'a Path<'a>, PathItem<'a>),
}

impl<'a> Path<'a> {
    #[must_use]
    pub fn key(&'a self, key: &'a str) -> Path<'a> {
        Path::Child(self, PathItem::Key(key))
    }

    #[must_use]
    pub fn index(&'a self, index: usize) -> Path<'a> {
        Path::Child(self, PathItem::Index(index))
    }

    /// Items from the root down to this path.
    #[must_use]
    pub fn items(&self) -> Vec<PathItem<'a>> {
        let mut items = Vec::new();
        let mut cursor = *self;
        while let Path::Child(parent, item) = cursor {
            items.push(item);
            cursor = *parent;
        }
        items.reverse();
        items
    }

    fn ends_with_slash(&self) -> bool {
        !matches!(self, Path::Child(_, PathItem::Key(_)))
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Path::Child(parent, item) = self else {
            return f.write_str("/");
        };
        fmt::Display::fmt(parent, f)?;
        if !parent.ends_with_slash() {
            f.write_str("/")?;
        }
        match item {
            PathItem::Key(key) => f.write_str(key),
            PathItem::Index(index) => write!(f, "{index}/"),
        }
    }
}

/// Builds a [`Path`] from the root, e.g. `path!(root, "items", 0, "name")`.
///
/// Each intermediate path is bound to a hidden local, so the macro can only
/// be used where the resulting path does not outlive the enclosing block.
#[macro_export]
macro_rules! path {
    ($root:ident $(,)?) => {
        let $root = $crate::Path::Root;
    };
    ($root:ident, $($item:expr),+ $(,)?) => {
        let $root = $crate::Path::Root;
        $(
            let $root = $crate::path::Step::step(&$item, &$root);
        )+
    };
}

/// A value usable as one [`path!`] step.
#[doc(hidden)]
pub trait Step {
    fn step<'a>(&'a self, parent: &'a Path<'a>) -> Path<'a>;
}

impl Step for &str {
    fn step<'a>(&'a self, parent: &'a Path<'a>) -> Path<'a> {
        parent.key(self)
    }
}

impl Step for usize {
    fn step<'a>(&'a self, parent: &'a Path<'a>) -> Path<'a> {
        parent.index(*self)
    }
}

impl Step for i32 {
    fn step<'a>(&'a self, parent: &'a Path<'a>) -> Path<'a> {
        parent.index(usize::try_from(*self).unwrap_or_default())
    }
}
