//! Mutual-follow detection.
use crate::types::{FALLBACK_PAIR, MutualPair, Outcome, User, UserId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Every pair `(a, b)` where `a` follows `b` and `b` follows `a`, once each,
/// ascending by low id then high id.
///
/// A user listing itself in `follows` forms the pair `(id, id)`. When an id
/// appears on more than one user record the last record's follow-set is the
/// one consulted, while every record still contributes its own edges.
///
/// ```
/// use hook_graph::{find_mutual_pairs, MutualPair, User};
///
/// let users = vec![User::new(1, vec![2]), User::new(2, vec![1, 3]), User::new(3, vec![2])];
/// assert_eq!(
///     find_mutual_pairs(&users),
///     vec![MutualPair::new(1, 2), MutualPair::new(2, 3)]
/// );
/// ```
pub fn find_mutual_pairs(users: &[User]) -> Vec<MutualPair> {
    let follows: HashMap<UserId, HashSet<UserId>> = users
        .iter()
        .map(|u| (u.id, u.follows.iter().copied().collect()))
        .collect();

    let mut pairs = BTreeSet::new();
    for user in users {
        for &followed in &user.follows {
            let followed_back = follows
                .get(&followed)
                .is_some_and(|theirs| theirs.contains(&user.id));
            if followed_back {
                pairs.insert(MutualPair::new(user.id, followed));
            }
        }
    }

    tracing::debug!(users = users.len(), pairs = pairs.len(), "graph.mutual_pairs");
    pairs.into_iter().collect()
}

/// The outcome to post for `pairs`: the pairs themselves, or the fixed
/// fallback pair when there are none.
pub fn decide_outcome(pairs: Vec<MutualPair>) -> Outcome {
    if pairs.is_empty() {
        Outcome::Fallback(FALLBACK_PAIR)
    } else {
        Outcome::Pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(edges: &[(UserId, &[UserId])]) -> Vec<User> {
        edges
            .iter()
            .map(|(id, follows)| User::new(*id, follows.to_vec()))
            .collect()
    }

    /// Quadratic reference: check every ordered edge against every user.
    fn brute_force(users: &[User]) -> Vec<MutualPair> {
        let mut out = Vec::new();
        for a in users {
            for &b in &a.follows {
                let b_follows_a = users
                    .iter()
                    .rev()
                    .find(|u| u.id == b)
                    .is_some_and(|u| u.follows.contains(&a.id));
                let pair = MutualPair::new(a.id, b);
                if b_follows_a && !out.contains(&pair) {
                    out.push(pair);
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn chain_with_two_mutual_links() {
        let users = graph(&[(1, &[2]), (2, &[1, 3]), (3, &[2])]);
        let outcome = decide_outcome(find_mutual_pairs(&users));
        assert_eq!(serde_json::to_value(outcome).unwrap(), json!([[1, 2], [2, 3]]));
    }

    #[test]
    fn one_way_follows_fall_back() {
        let users = graph(&[(1, &[2]), (2, &[3])]);
        let outcome = decide_outcome(find_mutual_pairs(&users));
        assert!(outcome.is_fallback());
        assert_eq!(serde_json::to_value(outcome).unwrap(), json!([4, 5]));
    }

    #[test]
    fn empty_graph_falls_back() {
        assert_eq!(decide_outcome(find_mutual_pairs(&[])), Outcome::Fallback(FALLBACK_PAIR));
    }

    #[test]
    fn self_follow_counts_as_mutual() {
        let users = graph(&[(7, &[7])]);
        assert_eq!(find_mutual_pairs(&users), vec![MutualPair::new(7, 7)]);
    }

    #[test]
    fn duplicate_edges_collapse_to_one_pair() {
        let users = graph(&[(2, &[1, 1, 1]), (1, &[2, 2])]);
        assert_eq!(find_mutual_pairs(&users), vec![MutualPair::new(1, 2)]);
    }

    #[test]
    fn dangling_ids_never_pair() {
        let users = graph(&[(1, &[42]), (2, &[1])]);
        assert!(find_mutual_pairs(&users).is_empty());
    }

    #[test]
    fn repeated_id_uses_last_follow_set() {
        let users = graph(&[(1, &[2]), (2, &[1]), (1, &[]), (2, &[])]);
        assert!(find_mutual_pairs(&users).is_empty());

        let users = graph(&[(1, &[]), (2, &[]), (1, &[2]), (2, &[1])]);
        assert_eq!(find_mutual_pairs(&users), vec![MutualPair::new(1, 2)]);
    }

    #[test]
    fn negative_ids_sort_first() {
        let users = graph(&[(-3, &[5]), (5, &[-3, 0]), (0, &[5])]);
        assert_eq!(
            find_mutual_pairs(&users),
            vec![MutualPair::new(-3, 5), MutualPair::new(0, 5)]
        );
    }

    #[test]
    fn running_twice_gives_identical_order() {
        let users = graph(&[(9, &[1, 4]), (4, &[9, 1]), (1, &[4, 9]), (3, &[3])]);
        let first = find_mutual_pairs(&users);
        let second = find_mutual_pairs(&users);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].low() <= w[1].low()));
    }

    #[test]
    fn matches_brute_force_on_generated_graphs() {
        // Small LCG so the graphs are deterministic without a rand dependency.
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = |bound: u64| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) % bound
        };

        for _ in 0..200 {
            let n = next(8) as UserId + 1;
            let users: Vec<User> = (0..n)
                .map(|id| {
                    let degree = next(5);
                    let follows = (0..degree).map(|_| next(n as u64 + 2) as UserId).collect::<Vec<_>>();
                    User::new(id, follows)
                })
                .collect();
            assert_eq!(find_mutual_pairs(&users), brute_force(&users), "graph: {users:?}");
        }
    }
}
