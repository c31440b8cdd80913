use core::fmt::Display;

use crate::prelude_internal::*;

/// A parsed path expression.
///
/// `a.b[2].c` is stored as `[Key("a"), Key("b"), Index(Some(2)), Key("c")]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Plural)]
pub struct FieldPath(pub Vec<PathSegment>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Member of a mapping
    Key(String),
    /// Element of a sequence. `None` is the not-a-number index produced by `[]`.
    Index(Option<usize>),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index(_))
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(Some(index))
    }
}

/// Split a path expression into raw segments.
///
/// Segments are separated by `.`; a `[digits]` token is always its own segment,
/// even when not preceded by a dot. Empty pieces (leading dots, `a..b`) are
/// dropped. A bracket that is not closed, or that encloses anything other than
/// digits, stays part of a literal segment: `"a[3"` is one segment.
pub fn split_name(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for piece in path.split('.') {
        split_piece(piece, &mut segments);
    }
    segments
}

fn split_piece<'a>(piece: &'a str, out: &mut Vec<&'a str>) {
    let bytes = piece.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'['
            && let Some(end) = bracket_end(bytes, i)
        {
            if start < i {
                out.push(&piece[start..i]);
            }
            out.push(&piece[i..=end]);
            i = end + 1;
            start = i;
            continue;
        }
        i += 1;
    }
    if start < bytes.len() {
        out.push(&piece[start..]);
    }
}

/// Position of the `]` closing a digits-only bracket opened at `open`.
fn bracket_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut j = open + 1;
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
    }
    (j < bytes.len() && bytes[j] == b']').then_some(j)
}

/// Whether `segment` is an array index token (`[N]` or `[]`).
pub fn is_array_segment(segment: &str) -> bool {
    segment.len() >= 2
        && segment.starts_with('[')
        && segment.ends_with(']')
        && segment[1..segment.len() - 1]
            .bytes()
            .all(|b| b.is_ascii_digit())
}

/// Convert a raw segment into an index or a key.
///
/// `[]` (no digits) yields `Index(None)`, the not-a-number index: reads through
/// it find nothing and writes through it are rejected.
pub fn to_index_or_key(segment: &str) -> PathSegment {
    if is_array_segment(segment) {
        PathSegment::Index(segment[1..segment.len() - 1].parse().ok())
    } else {
        PathSegment::Key(segment.to_string())
    }
}

/// Number of leading dots when `expr` is relative (dots followed by a segment).
fn relative_depth(expr: &str) -> Option<usize> {
    let dots = expr.bytes().take_while(|b| *b == b'.').count();
    (dots > 0 && dots < expr.len()).then_some(dots)
}

/// Resolve `expr` against `anchor`.
///
/// A relative expression starting with `k` dots drops the last `k` segments of
/// the anchor and appends the remainder, so `.zip` from `user.address.city`
/// is `user.address.zip` and `..zip` is `user.zip`. Expressions without a
/// leading dot are absolute and returned unchanged.
pub fn resolve_relative(anchor: &str, expr: &str) -> String {
    if relative_depth(expr).is_none() {
        return expr.to_string();
    }
    FieldPath::parse(anchor).resolve(expr).to_string()
}

impl FieldPath {
    /// An empty path addressing the root container
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a path expression. Leading dots are ignored; use
    /// [`FieldPath::resolve`] for relative expressions.
    pub fn parse(path: &str) -> Self {
        FieldPath(split_name(path).into_iter().map(to_index_or_key).collect())
    }

    pub fn is_relative(expr: &str) -> bool {
        relative_depth(expr).is_some()
    }

    /// Resolve `expr` using `self` as the anchor.
    pub fn resolve(&self, expr: &str) -> FieldPath {
        match relative_depth(expr) {
            Some(depth) => {
                let keep = self.0.len().saturating_sub(depth);
                let mut segments = self.0[..keep].to_vec();
                segments.extend(FieldPath::parse(&expr[depth..]).0);
                FieldPath(segments)
            }
            None => FieldPath::parse(expr),
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    pub fn parent(&self) -> Option<FieldPath> {
        let (_, parent) = self.0.split_last()?;
        Some(FieldPath(parent.to_vec()))
    }

    pub fn child_key(&self, key: impl Into<String>) -> FieldPath {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        FieldPath(segments)
    }

    pub fn child_index(&self, index: usize) -> FieldPath {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(Some(index)));
        FieldPath(segments)
    }

    /// True when `self` equals `other` or lies below it.
    pub fn starts_with(&self, other: &FieldPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::parse(path)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i != 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", key)?;
                }
                PathSegment::Index(Some(index)) => write!(f, "[{}]", index)?,
                PathSegment::Index(None) => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}
