//! Screen anchors that particles fly between

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Layout box in viewport coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Something on screen whose position can be measured on demand.
///
/// Returns `None` while the element is not mounted.
pub trait Anchor: Send + Sync {
    fn measure(&self) -> Option<Rect>;
}

impl Anchor for Rect {
    fn measure(&self) -> Option<Rect> {
        Some(*self)
    }
}

/// Anchor whose layout is pushed by the view that owns the element
#[derive(Debug, Clone, Default)]
pub struct LayoutAnchor {
    rect: Arc<RwLock<Option<Rect>>>,
}

impl LayoutAnchor {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Arc::new(RwLock::new(Some(rect))),
        }
    }

    pub fn set(&self, rect: Rect) {
        *self.rect.write().unwrap_or_else(PoisonError::into_inner) = Some(rect);
    }

    pub fn unmount(&self) {
        *self.rect.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Anchor for LayoutAnchor {
    fn measure(&self) -> Option<Rect> {
        *self.rect.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Named animation targets (the wishlist badge, the cart icon, ...)
#[derive(Clone, Default)]
pub struct AnchorRegistry {
    anchors: Arc<RwLock<HashMap<String, Arc<dyn Anchor>>>>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, anchor: Arc<dyn Anchor>) {
        self.anchors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), anchor);
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.anchors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Anchor>> {
        self.anchors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}
