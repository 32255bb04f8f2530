//! Route augmentations: caller-supplied cross-cutting behavior (auth checks,
//! rate limits, tracing) attached to generated routes by route-name
//! include/exclude rules. No per-method granularity: a matching group applies
//! to every route of the entity.

use axum::Router;
use regex::Regex;
use std::sync::Arc;

/// One augmentation: an arbitrary transformation of an entity's router,
/// typically a middleware layer.
pub type RouteAugmentation = Arc<dyn Fn(Router) -> Router + Send + Sync>;

/// Literal or pattern match against an entity's route name.
#[derive(Clone, Debug)]
pub enum NameMatcher {
    Literal(String),
    Pattern(Regex),
}

impl NameMatcher {
    pub fn literal(s: impl Into<String>) -> Self {
        NameMatcher::Literal(s.into())
    }

    pub fn pattern(re: Regex) -> Self {
        NameMatcher::Pattern(re)
    }

    fn matches(&self, route_name: &str) -> bool {
        match self {
            NameMatcher::Literal(s) => s == route_name,
            NameMatcher::Pattern(re) => re.is_match(route_name),
        }
    }
}

/// A group of augmentations with inclusion/exclusion rules. Groups apply in
/// declaration order; within a group, augmentations apply in order.
#[derive(Clone, Default)]
pub struct AugmentGroup {
    pub augment: Vec<RouteAugmentation>,
    /// When present, the group applies only to matching route names.
    pub include: Option<Vec<NameMatcher>>,
    /// Exclusion wins over inclusion.
    pub exclude: Vec<NameMatcher>,
}

impl AugmentGroup {
    pub fn applies_to(&self, route_name: &str) -> bool {
        if self.exclude.iter().any(|m| m.matches(route_name)) {
            return false;
        }
        match &self.include {
            Some(include) => include.iter().any(|m| m.matches(route_name)),
            None => true,
        }
    }

    /// Apply every augmentation of this group to the router.
    pub fn apply(&self, mut router: Router) -> Router {
        for augmentation in &self.augment {
            router = augmentation(router);
        }
        router
    }
}
