//! Hand-written knowledge about every placement: its name and what it takes to reach it.
//!
//! Requirements are lists of comma separated AND-groups, any one of which is enough:
//! `["whip, feather", "grappleClaw"]`. Names prefixed with `event:` refer to entries of
//! `events` and are expanded away by [`expand_events`].

use serde::{Deserialize, Serialize};

use crate::{RandomizerError, Result};

/// Sub weapons on the night surface, present in the script but never shuffled.
pub const NIGHT_SURFACE_SUB_WEAPON_COUNT: usize = 1;
pub const NIGHT_SURFACE_CHEST_COUNT: usize = 3;
pub const NIGHT_SURFACE_SEAL_COUNT: usize = 1;
pub const TRUE_SHRINE_OF_THE_MOTHER_SEAL_COUNT: usize = 1;
/// Shops whose talk is not described by any supplement entry.
pub const WARE_NO_MISE_COUNT: usize = 1;

pub const EVENT_PREFIX: &str = "event:";
const MAX_EVENT_ITERATIONS: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotSupplement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopSupplement {
    pub names: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplements {
    pub main_weapons: Vec<SpotSupplement>,
    pub sub_weapons: Vec<SpotSupplement>,
    pub chests: Vec<SpotSupplement>,
    pub seals: Vec<SpotSupplement>,
    pub shops: Vec<ShopSupplement>,
    #[serde(default)]
    pub events: Vec<SpotSupplement>,
}

impl Supplements {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

pub type RequirementGroups = Vec<Vec<String>>;

/// Splits `"a, b"` style groups; no groups means the spot is always reachable.
pub fn parse_requirements(requirements: &[String]) -> Option<RequirementGroups> {
    if requirements.is_empty() {
        return None;
    }
    Some(
        requirements
            .iter()
            .map(|group| group.split(',').map(|x| x.trim().to_owned()).collect())
            .collect(),
    )
}

#[derive(Clone, Debug, PartialEq)]
struct Event {
    name: String,
    requirements: RequirementGroups,
}

fn mentions_event(groups: &RequirementGroups) -> bool {
    groups
        .iter()
        .any(|group| group.iter().any(|x| x.starts_with(EVENT_PREFIX)))
}

// [[event:a, event:b, c]] with event:a = [[d, e]] and event:b = [[f], [g]]
// becomes [[d, e, event:b, c]], then [[f, d, e, c], [g, d, e, c]].
fn merge_events(requirements: RequirementGroups, events: &[Event]) -> RequirementGroups {
    let mut current = requirements;
    for event in events {
        if !current.iter().any(|group| group.contains(&event.name)) {
            continue;
        }
        current = current
            .into_iter()
            .flat_map(|target| -> Vec<Vec<String>> {
                if !target.contains(&event.name) {
                    return vec![target];
                }
                event
                    .requirements
                    .iter()
                    .map(|event_group| {
                        event_group
                            .iter()
                            .cloned()
                            .chain(
                                target
                                    .iter()
                                    .filter(|x| **x != event.name && !event_group.contains(x))
                                    .cloned(),
                            )
                            .collect()
                    })
                    .collect()
            })
            .collect();
    }
    current
}

fn resolve_events(events: &[SpotSupplement]) -> Result<Vec<Event>> {
    let mut current: Vec<Event> = events
        .iter()
        .map(|x| Event {
            name: x.name.clone(),
            requirements: parse_requirements(&x.requirements).unwrap_or_default(),
        })
        .collect();
    for _ in 0..MAX_EVENT_ITERATIONS {
        let resolved: Vec<Event> = current
            .iter()
            .filter(|x| !mentions_event(&x.requirements))
            .cloned()
            .collect();
        if resolved.len() == current.len() {
            return Ok(current);
        }
        current = current
            .into_iter()
            .map(|x| Event {
                requirements: merge_events(x.requirements, &resolved),
                name: x.name,
            })
            .collect();
    }
    let unresolved = current
        .iter()
        .filter(|x| mentions_event(&x.requirements))
        .map(|x| x.name.clone())
        .collect();
    Err(RandomizerError::EventExpansionDiverged { unresolved })
}

fn join_groups(groups: RequirementGroups) -> Vec<String> {
    groups.into_iter().map(|group| group.join(", ")).collect()
}

fn expand_list(requirements: &mut Vec<String>, events: &[Event]) {
    if let Some(groups) = parse_requirements(requirements) {
        *requirements = join_groups(merge_events(groups, events));
    }
}

/// Replaces every `event:` reference in the placement lists by the event's own requirements.
/// The returned supplements carry no events.
pub fn expand_events(supplements: &Supplements) -> Result<Supplements> {
    let events = resolve_events(&supplements.events)?;
    let mut expanded = supplements.clone();
    expanded.events.clear();
    for spot in expanded
        .main_weapons
        .iter_mut()
        .chain(expanded.sub_weapons.iter_mut())
        .chain(expanded.chests.iter_mut())
        .chain(expanded.seals.iter_mut())
    {
        expand_list(&mut spot.requirements, &events);
    }
    for shop in expanded.shops.iter_mut() {
        expand_list(&mut shop.requirements, &events);
    }
    Ok(expanded)
}
