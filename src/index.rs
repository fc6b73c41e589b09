use std::collections::BTreeMap;

/// Fold `items` into a map keyed by `key`, in one pass.
///
/// The first item seen for a key is turned into the accumulated value by `init`;
/// every later item with the same key is folded in with `combine`. The merge policy
/// lives entirely in `combine`: ignoring the new item gives "first wins", pushing it
/// gives grouping.
pub fn index_by<T, K, V, I, KF, IF, CF>(
    items: I,
    mut key: KF,
    mut init: IF,
    mut combine: CF,
) -> BTreeMap<K, V>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    KF: FnMut(&T) -> K,
    IF: FnMut(T) -> V,
    CF: FnMut(&mut V, T),
{
    let mut out = BTreeMap::new();
    for item in items {
        let k = key(&item);
        match out.get_mut(&k) {
            Some(existing) => combine(existing, item),
            None => {
                let value = init(item);
                out.insert(k, value);
            }
        }
    }
    out
}

/// One entry per key; later duplicates are dropped.
pub fn first_by_key<T, K, I, KF>(items: I, key: KF) -> BTreeMap<K, T>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    KF: FnMut(&T) -> K,
{
    index_by(items, key, |item| item, |_, _| {})
}

/// Every item sharing a key, in input order.
pub fn group_by_key<T, K, I, KF>(items: I, key: KF) -> BTreeMap<K, Vec<T>>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    KF: FnMut(&T) -> K,
{
    index_by(items, key, |item| vec![item], |group, item| group.push(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wins_keeps_earliest_value() {
        let items = vec![("a", 1), ("a", 2)];
        let index = index_by(items, |(k, _)| *k, |(_, v)| v, |_, _| {});
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a"), Some(&1));
    }

    #[test]
    fn grouping_appends_in_order() {
        let items = vec![("a", 1), ("a", 2)];
        let index = index_by(
            items,
            |(k, _)| *k,
            |(_, v)| vec![v],
            |group: &mut Vec<i32>, (_, v)| group.push(v),
        );
        assert_eq!(index.get("a"), Some(&vec![1, 2]));
    }

    #[test]
    fn helpers_match_index_by() {
        let items = vec![("b", 3), ("a", 1), ("b", 4)];
        let first = first_by_key(items.clone(), |(k, _)| *k);
        assert_eq!(first.get("b"), Some(&("b", 3)));
        let groups = group_by_key(items, |(k, _)| *k);
        assert_eq!(groups.get("b").map(|g| g.len()), Some(2));
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let index = group_by_key(Vec::<(String, i32)>::new(), |(k, _)| k.clone());
        assert!(index.is_empty());
    }
}
