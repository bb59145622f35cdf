use std::collections::HashSet;

use crate::{model::character::Character, server::model::upstream::Location};

/// Keep the characters whose origin is one of `locations`, in their original order.
///
/// Origins are compared by name only; the URL of the reference is ignored.
pub fn filter_by_origin(characters: Vec<Character>, locations: &[Location]) -> Vec<Character> {
    let names: HashSet<&str> = locations.iter().map(|l| l.name.as_str()).collect();

    characters
        .into_iter()
        .filter(|character| names.contains(character.origin.name.as_str()))
        .collect()
}
