//! Collider filter for selecting query candidates
//!
//! Three independent rule sets decide whether a body takes part in a query:
//! explicit id rules (absolute precedence), a space allow-list (default deny)
//! and an attribute deny-list that only applies once the space matched.

use std::collections::HashMap;

use crate::physics::id::{Attributes, Id, Space, SpaceMask};
use crate::spatial::Body;

/// Inclusion/exclusion predicate built per query by gameplay code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColliderOptions {
    ids: HashMap<Id, bool>,
    spaces: SpaceMask,
    denied_attributes: Attributes,
}

impl ColliderOptions {
    /// Empty filter: matches nothing until spaces or ids are allowed
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter allowing every known space
    pub fn all_spaces() -> Self {
        Self::new().with_spaces(Space::ALL, true)
    }

    /// Add explicit id rules
    pub fn set_ids(&mut self, ids: impl IntoIterator<Item = Id>, include: bool) -> &mut Self {
        for id in ids {
            self.ids.insert(id, include);
        }
        self
    }

    /// Allow or disallow spaces
    pub fn set_spaces(&mut self, spaces: impl IntoIterator<Item = Space>, include: bool) -> &mut Self {
        let mask: SpaceMask = spaces.into_iter().collect();
        self.spaces.set(mask, include);
        self
    }

    /// Add attribute rules. Attribute rules are deny-only, so `include = true`
    /// just lifts a previous denial.
    pub fn set_attributes(&mut self, attributes: Attributes, include: bool) -> &mut Self {
        self.denied_attributes.set(attributes, !include);
        self
    }

    /// Builder form of [`set_ids`](Self::set_ids)
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = Id>, include: bool) -> Self {
        self.set_ids(ids, include);
        self
    }

    /// Builder form of [`set_spaces`](Self::set_spaces)
    pub fn with_spaces(mut self, spaces: impl IntoIterator<Item = Space>, include: bool) -> Self {
        self.set_spaces(spaces, include);
        self
    }

    /// Builder form of [`set_attributes`](Self::set_attributes)
    pub fn with_attributes(mut self, attributes: Attributes, include: bool) -> Self {
        self.set_attributes(attributes, include);
        self
    }

    /// Whether a body passes the filter
    pub fn evaluate(&self, body: &Body) -> bool {
        self.evaluate_parts(body.id, body.attributes)
    }

    /// Filter decision from an id and its attributes
    pub fn evaluate_parts(&self, id: Id, attributes: Attributes) -> bool {
        if let Some(&include) = self.ids.get(&id) {
            return include;
        }
        if !self.spaces.has(id.space()) {
            return false;
        }
        if self.denied_attributes.is_empty() {
            return true;
        }
        !attributes.intersects(self.denied_attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(n: u32) -> Id {
        Id::new(Space::Player, n)
    }

    #[test]
    fn test_default_denies_everything() {
        let options = ColliderOptions::new();
        assert!(!options.evaluate_parts(player(1), Attributes::empty()));
    }

    #[test]
    fn test_space_allow_list() {
        let options = ColliderOptions::new().with_spaces([Space::Wall], true);
        assert!(options.evaluate_parts(Id::new(Space::Wall, 3), Attributes::SOLID));
        assert!(!options.evaluate_parts(player(1), Attributes::empty()));
    }

    #[test]
    fn test_id_rules_take_precedence() {
        let options = ColliderOptions::all_spaces()
            .with_ids([player(1)], false)
            .with_ids([Id::new(Space::Projectile, 9)], true)
            .with_spaces([Space::Projectile], false)
            .with_attributes(Attributes::DEAD, false);

        assert!(!options.evaluate_parts(player(1), Attributes::empty()));
        assert!(options.evaluate_parts(player(2), Attributes::empty()));
        // space removed and attribute denied, but the explicit id wins
        assert!(options.evaluate_parts(Id::new(Space::Projectile, 9), Attributes::DEAD));
    }

    #[test]
    fn test_attribute_deny_applies_after_space() {
        let options = ColliderOptions::new()
            .with_spaces([Space::Player], true)
            .with_attributes(Attributes::DEAD | Attributes::INTANGIBLE, false);

        assert!(options.evaluate_parts(player(1), Attributes::SOLID));
        assert!(!options.evaluate_parts(player(2), Attributes::DEAD));
        assert!(!options.evaluate_parts(player(3), Attributes::INTANGIBLE));
        // wall is filtered by space before attributes are consulted
        assert!(!options.evaluate_parts(Id::new(Space::Wall, 1), Attributes::empty()));
    }

    #[test]
    fn test_include_attribute_lifts_denial() {
        let mut options = ColliderOptions::all_spaces();
        options.set_attributes(Attributes::DEAD, false);
        assert!(!options.evaluate_parts(player(1), Attributes::DEAD));
        options.set_attributes(Attributes::DEAD, true);
        assert!(options.evaluate_parts(player(1), Attributes::DEAD));
    }
}
