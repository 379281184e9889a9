//! Combining event contributions from several sources into one map.

use std::collections::{BTreeMap, HashMap};

use super::handler::{EventHandler, EventMap};
use crate::error::AlloyError;

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Merge per-source handler maps.
///
/// An event with one contributor keeps its handler. An event with several
/// needs an entry in `order` naming every contributor; the handlers are then
/// fused in that order. Every ordering problem is collected and reported
/// together.
pub fn combine_events(
    uid: &str,
    sources: Vec<(String, EventMap)>,
    order: &HashMap<String, Vec<String>>,
) -> Result<EventMap, AlloyError> {
    let mut grouped: BTreeMap<String, Vec<(String, EventHandler)>> = BTreeMap::new();
    for (source, events) in sources {
        for (event, handler) in events {
            grouped
                .entry(event)
                .or_default()
                .push((source.clone(), handler));
        }
    }

    let mut combined = EventMap::new();
    let mut problems = Vec::new();
    for (event, mut contributors) in grouped {
        if contributors.len() == 1 {
            if let Some((_, handler)) = contributors.pop() {
                combined.insert(event, handler);
            }
            continue;
        }

        let names: Vec<&str> = contributors.iter().map(|(s, _)| s.as_str()).collect();
        let Some(event_order) = order.get(&event) else {
            problems.push(format!(
                "The event ({event}) has more than one behaviour that listens to it.\n\
                 When this occurs, you must specify an event ordering for the behaviours in your spec \
                 (e.g. [ \"listing\", \"toggling\" ]).\n\
                 The behaviours that can trigger it are: [{}]",
                quoted(&names)
            ));
            continue;
        };

        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| !event_order.iter().any(|o| o == n))
            .collect();
        if !missing.is_empty() {
            let listed: Vec<&str> = event_order.iter().map(String::as_str).collect();
            problems.push(format!(
                "The event ordering for {event} does not have an entry for [{}].\n\
                 Order specified: [{}]\n\
                 The behaviours that can trigger it are: [{}]",
                quoted(&missing),
                quoted(&listed),
                quoted(&names)
            ));
            continue;
        }

        contributors.sort_by_key(|(source, _)| event_order.iter().position(|o| o == source));
        let fused = EventHandler::fuse(contributors.into_iter().map(|(_, h)| h).collect());
        combined.insert(event, fused);
    }

    if problems.is_empty() {
        Ok(combined)
    } else {
        Err(AlloyError::EventOrder {
            uid: uid.to_owned(),
            problems,
        })
    }
}
