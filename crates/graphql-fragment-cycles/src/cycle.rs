use std::{collections::HashSet, num::NonZeroUsize};

use indexmap::IndexSet;

use crate::{Error, Result, dependencies::FragmentDependencies};

struct Frame<'a> {
    spreads: std::slice::Iter<'a, &'a str>,
}

/// Depth-first search over the fragment graph, failing on the first fragment reached again
/// while it is still being explored.
///
/// Fragments are explored in definition order. Spreads of fragments missing from `dependencies`
/// lead nowhere. The walk keeps its own stack, and fails once more than `max_depth` fragments
/// are being explored at the same time.
pub fn detect_cycle<'a>(dependencies: &'a FragmentDependencies<'a>, max_depth: NonZeroUsize) -> Result<()> {
    let mut visited: HashSet<&'a str> = HashSet::with_capacity(dependencies.len());
    // Fragments currently being explored, in the order they were entered.
    let mut ancestry: IndexSet<&'a str> = IndexSet::new();
    let mut frames: Vec<Frame<'a>> = Vec::new();

    for root in dependencies.fragment_names() {
        if visited.contains(root) {
            continue;
        }

        enter(root, dependencies, max_depth, &mut ancestry, &mut frames)?;

        while let Some(frame) = frames.last_mut() {
            let Some(&fragment_name) = frame.spreads.next() else {
                frames.pop();
                if let Some(done) = ancestry.pop() {
                    visited.insert(done);
                }
                continue;
            };

            if let Some(start) = ancestry.get_index_of(fragment_name) {
                let fragment_path = ancestry
                    .iter()
                    .skip(start)
                    .chain(std::iter::once(&fragment_name))
                    .map(|name| name.to_string())
                    .collect::<Vec<_>>();

                tracing::debug!(?fragment_path, "fragment cycle detected");

                return Err(Error::CircularFragment { fragment_path });
            }

            if visited.contains(fragment_name) {
                continue;
            }

            enter(fragment_name, dependencies, max_depth, &mut ancestry, &mut frames)?;
        }
    }

    tracing::trace!(fragments = visited.len(), "no fragment cycle");

    Ok(())
}

fn enter<'a>(
    fragment_name: &'a str,
    dependencies: &'a FragmentDependencies<'a>,
    max_depth: NonZeroUsize,
    ancestry: &mut IndexSet<&'a str>,
    frames: &mut Vec<Frame<'a>>,
) -> Result<()> {
    if ancestry.len() >= max_depth.get() {
        tracing::debug!(fragment_name, limit = max_depth.get(), "fragment chain too deep");

        return Err(Error::FragmentChainTooDeep {
            depth: ancestry.len() + 1,
            limit: max_depth.get(),
        });
    }

    ancestry.insert(fragment_name);
    frames.push(Frame {
        spreads: dependencies.get(fragment_name).unwrap_or_default().iter(),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_LIMIT: NonZeroUsize = NonZeroUsize::MAX;

    fn graph<'a>(edges: Vec<(&'a str, Vec<&'a str>)>) -> FragmentDependencies<'a> {
        edges.into_iter().collect()
    }

    fn cycle_of(dependencies: &FragmentDependencies<'_>) -> Option<Vec<String>> {
        match detect_cycle(dependencies, NO_LIMIT) {
            Err(Error::CircularFragment { fragment_path }) => Some(fragment_path),
            _ => None,
        }
    }

    #[test]
    fn empty_graph() {
        assert!(detect_cycle(&FragmentDependencies::default(), NO_LIMIT).is_ok());
    }

    #[test]
    fn self_loop() {
        let dependencies = graph(vec![("A", vec!["A"])]);
        assert_eq!(cycle_of(&dependencies), Some(vec!["A".to_string(), "A".to_string()]));
    }

    #[test]
    fn path_starts_at_the_repeated_fragment() {
        let dependencies = graph(vec![("Root", vec!["A"]), ("A", vec!["B"]), ("B", vec!["C"]), ("C", vec!["A"])]);
        assert_eq!(
            cycle_of(&dependencies),
            Some(vec!["A".into(), "B".into(), "C".into(), "A".into()])
        );
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let dependencies = graph(vec![("A", vec!["B", "C"]), ("B", vec!["D"]), ("C", vec!["D"]), ("D", vec![])]);
        assert!(detect_cycle(&dependencies, NO_LIMIT).is_ok());
    }

    #[test]
    fn shared_fragment_explored_once_is_not_reported_from_a_sibling() {
        // D is finished before C reaches it again.
        let dependencies = graph(vec![("A", vec!["D", "C"]), ("C", vec!["D"]), ("D", vec!["E"]), ("E", vec![])]);
        assert!(detect_cycle(&dependencies, NO_LIMIT).is_ok());
    }

    #[test]
    fn ancestry_is_unwound_between_roots() {
        let dependencies = graph(vec![("A", vec!["B"]), ("B", vec![]), ("C", vec!["B", "A"])]);
        assert!(detect_cycle(&dependencies, NO_LIMIT).is_ok());
    }

    #[test]
    fn undefined_spreads_lead_nowhere() {
        let dependencies = graph(vec![("A", vec!["Missing", "B"]), ("B", vec!["AlsoMissing"])]);
        assert!(detect_cycle(&dependencies, NO_LIMIT).is_ok());
    }

    #[test]
    fn cycle_reached_from_a_later_root() {
        let dependencies = graph(vec![("D", vec!["E"]), ("E", vec![]), ("A", vec!["B"]), ("B", vec!["A"])]);
        assert_eq!(cycle_of(&dependencies), Some(vec!["A".into(), "B".into(), "A".into()]));
    }

    #[test]
    fn depth_limit_is_inclusive() {
        let dependencies = graph(vec![("A", vec!["B"]), ("B", vec!["C"]), ("C", vec![])]);

        let three = NonZeroUsize::new(3).unwrap();
        assert!(detect_cycle(&dependencies, three).is_ok());

        let two = NonZeroUsize::new(2).unwrap();
        assert!(matches!(
            detect_cycle(&dependencies, two),
            Err(Error::FragmentChainTooDeep { depth: 3, limit: 2 })
        ));
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let names = (0..100_000).map(|i| format!("F{i}")).collect::<Vec<_>>();
        let dependencies = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let spreads = names.get(i + 1).map(|next| vec![next.as_str()]).unwrap_or_default();
                (name.as_str(), spreads)
            })
            .collect::<FragmentDependencies<'_>>();

        assert!(detect_cycle(&dependencies, NO_LIMIT).is_ok());
    }
}
