//! Tree paths for live elements
//!
//! A rendered element is identified by its position from the root: each
//! step is the child index, or the element's explicit `key` when it has
//! one. Paths are stable across passes as long as the template shape is.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePath {
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl TreePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a child at `index`, or under its explicit key
    pub fn child(&self, index: usize, key: Option<&str>) -> Self {
        let segment = match key {
            Some(key) => PathSegment::Key(key.to_string()),
            None => PathSegment::Index(index),
        };
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Key(key) => write!(f, "{{{}}}", key),
        }
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
