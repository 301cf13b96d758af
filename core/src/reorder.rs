/// Compute the new selection order for a "move A to the position of B"
/// event from the drag/touch UI. Returns `None` (no-op) when either id is
/// missing from the list or the move would not change anything; otherwise
/// the element at A's index is removed and reinserted at B's original index.
#[must_use]
pub fn move_item(order: &[i64], moved_id: i64, target_id: i64) -> Option<Vec<i64>> {
    let from = order.iter().position(|&id| id == moved_id)?;
    let to = order.iter().position(|&id| id == target_id)?;
    if from == to {
        return None;
    }
    let mut next = order.to_vec();
    let id = next.remove(from);
    next.insert(to, id);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_forward() {
        assert_eq!(move_item(&[1, 2, 3, 4], 1, 3), Some(vec![2, 3, 1, 4]));
    }

    #[test]
    fn test_move_backward() {
        assert_eq!(move_item(&[1, 2, 3, 4], 4, 2), Some(vec![1, 4, 2, 3]));
    }

    #[test]
    fn test_move_to_ends() {
        assert_eq!(move_item(&[1, 2, 3], 3, 1), Some(vec![3, 1, 2]));
        assert_eq!(move_item(&[1, 2, 3], 1, 3), Some(vec![2, 3, 1]));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        assert_eq!(move_item(&[1, 2, 3], 9, 2), None);
        assert_eq!(move_item(&[1, 2, 3], 1, 9), None);
        assert_eq!(move_item(&[], 1, 2), None);
    }

    #[test]
    fn test_self_move_is_noop() {
        assert_eq!(move_item(&[1, 2, 3], 2, 2), None);
    }

    #[test]
    fn test_result_is_permutation() {
        let order = [5, 1, 9, 2, 7];
        let moved = move_item(&order, 9, 5).unwrap();
        let mut sorted = moved.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 5, 7, 9]);
        assert_eq!(moved.len(), order.len());
    }
}
