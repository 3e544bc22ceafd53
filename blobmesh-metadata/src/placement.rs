//! Placement heuristic
//!
//! A deterministic but advisory circular walk over the alive-node list,
//! indexed by a stable hash of the chunk id. Spreads load without rack
//! awareness or capacity balancing; correctness never depends on the hash
//! value itself, only on picking distinct nodes until the factor is met
//! or the alive list is exhausted.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Choose up to `factor` distinct node ids from `alive`, starting at a
/// hash-derived offset and walking circularly.
pub fn choose_replicas<'a>(chunk_id: &str, alive: &'a [String], factor: usize) -> Vec<&'a str> {
    if alive.is_empty() {
        return Vec::new();
    }

    let mut hasher = DefaultHasher::new();
    chunk_id.hash(&mut hasher);
    let start = (hasher.finish() as usize) % alive.len();

    let mut selected = Vec::with_capacity(factor.min(alive.len()));
    for i in 0..alive.len() {
        let idx = (start + i) % alive.len();
        selected.push(alive[idx].as_str());
        if selected.len() == factor {
            break;
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_distinct_nodes_up_to_factor() {
        let alive = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let chosen = choose_replicas("f_chunk_0", &alive, 2);
        assert_eq!(chosen.len(), 2);
        assert_ne!(chosen[0], chosen[1]);
    }

    #[test]
    fn test_degrades_gracefully_below_factor() {
        let alive = vec!["only".to_string()];
        let chosen = choose_replicas("f_chunk_0", &alive, 2);
        assert_eq!(chosen, vec!["only"]);
    }

    #[test]
    fn test_empty_alive_set() {
        let alive: Vec<String> = Vec::new();
        assert!(choose_replicas("f_chunk_0", &alive, 2).is_empty());
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let alive = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let first = choose_replicas("stable.txt_chunk_3", &alive, 2);
        let second = choose_replicas("stable.txt_chunk_3", &alive, 2);
        assert_eq!(first, second);
    }
}
