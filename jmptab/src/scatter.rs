//! Utilities.

/// Move elements from `x = source[i]` to `destination[permutation(x)]`.
///
/// Elements landing on an already occupied slot are dropped, so the first element for each slot
/// wins. Returns the number of elements placed.
pub fn scatter<T>(
    source: impl IntoIterator<Item = T>,
    mut permutation: impl FnMut(&T) -> usize,
    destination: &mut [Option<T>],
) -> usize {
    let mut placed = 0;
    for element in source {
        let slot = &mut destination[permutation(&element)];
        if slot.is_none() {
            *slot = Some(element);
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{vec, vec::Vec};

    #[test]
    fn scatter_inverse() {
        let source = vec![5, 0, 4, 2, 3, 1, 6];
        let mut destination = vec![None; 7];
        assert_eq!(scatter(source, |&element| element, &mut destination), 7);
        assert_eq!(destination, (0..=6).map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn first_wins() {
        let source = vec![(1, 'a'), (0, 'b'), (1, 'c')];
        let mut destination = vec![None; 3];
        assert_eq!(scatter(source, |&(slot, _)| slot, &mut destination), 2);
        assert_eq!(destination, [Some((0, 'b')), Some((1, 'a')), None]);
    }
}
