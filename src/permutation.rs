/// Every ordering of `items`, in the order Heap's algorithm visits them.
///
/// The sequence is fixed: arrangement ids index into it, so changing the
/// generation order would silently reassign every participant.
pub fn full_permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut work = items.to_vec();
    let mut results = Vec::new();
    if work.is_empty() {
        results.push(work);
        return results;
    }
    let size = work.len();
    heap_permute(&mut work, size, &mut results);
    results
}

fn heap_permute<T: Clone>(work: &mut [T], size: usize, out: &mut Vec<Vec<T>>) {
    if size == 1 {
        out.push(work.to_vec());
        return;
    }

    for i in 0..size {
        heap_permute(work, size - 1, out);
        if size % 2 == 1 {
            work.swap(0, size - 1);
        } else {
            work.swap(i, size - 1);
        }
    }
}
