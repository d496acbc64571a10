use classic_ds::{compare, AvlSortedList, BinarySortedList, SortedArray, SortedList};

use crate::Op;

/// Applies a set of operations to a list and to a plain vector kept sorted by hand.
/// Returns whether every `add` and `remove` agreed with the vector on its outcome.
fn do_ops<L: SortedList<i8>>(ops: &[Op<i8>], list: &mut L, model: &mut Vec<i8>) -> bool {
    for op in ops {
        match *op {
            Op::Add(value) => {
                if !list.add(value) {
                    return false;
                }
                let index = model.partition_point(|item| *item <= value);
                model.insert(index, value);
            }
            Op::Remove(value) => {
                let expected = match model.iter().position(|item| *item == value) {
                    Some(index) => {
                        model.remove(index);
                        true
                    }
                    None => false,
                };
                if list.remove(&value) != expected {
                    return false;
                }
            }
        }
        if list.len() != model.len() {
            return false;
        }
    }
    true
}

fn matches_model<L: SortedList<i8>>(ops: Vec<Op<i8>>) -> bool {
    let mut list = L::with_comparator(compare::natural());
    let mut model = Vec::new();
    do_ops(&ops, &mut list, &mut model)
        && list.to_vec() == model
        && model.iter().all(|item| list.find(item) == Some(item))
}

#[quickcheck]
fn avl_matches_a_sorted_vec(ops: Vec<Op<i8>>) -> bool {
    matches_model::<AvlSortedList<i8>>(ops)
}

#[quickcheck]
fn binary_matches_a_sorted_vec(ops: Vec<Op<i8>>) -> bool {
    matches_model::<BinarySortedList<i8>>(ops)
}

#[quickcheck]
fn array_matches_a_sorted_vec(ops: Vec<Op<i8>>) -> bool {
    matches_model::<SortedArray<i8>>(ops)
}

#[quickcheck]
fn round_trip_keeps_multiplicity(xs: Vec<i16>) -> bool {
    let list = AvlSortedList::from_iter_with(compare::natural(), xs.iter().copied());
    let mut sorted = xs;
    sorted.sort_unstable();
    list.len() == sorted.len() && list.to_vec() == sorted
}

#[quickcheck]
fn implementations_agree(xs: Vec<i8>, removes: Vec<i8>) -> bool {
    let mut avl = AvlSortedList::from_iter_with(compare::natural(), xs.iter().copied());
    let mut binary = BinarySortedList::from_iter_with(compare::natural(), xs.iter().copied());
    let mut array = SortedArray::from_iter_with(compare::natural(), xs.iter().copied());
    for value in &removes {
        let removed = avl.remove(value);
        if binary.remove(value) != removed || array.remove(value) != removed {
            return false;
        }
    }
    avl.has_same_elements_as(&binary)
        && binary.has_same_elements_as(&array)
        && array.has_same_elements_as(&avl)
}

#[quickcheck]
fn intersection_keeps_common_items(xs: Vec<i8>, ys: Vec<i8>) -> bool {
    let left = AvlSortedList::from_iter_with(compare::natural(), xs.iter().copied());
    let right = SortedArray::from_iter_with(compare::natural(), ys.iter().copied());
    let common = left.intersection_with(&right).to_vec();

    common.windows(2).all(|pair| pair[0] <= pair[1])
        && common.iter().all(|item| xs.contains(item) && ys.contains(item))
        && ys
            .iter()
            .filter(|item| xs.contains(item))
            .count()
            == common.len()
}

#[quickcheck]
fn same_elements_is_symmetric(xs: Vec<i8>, ys: Vec<i8>) -> bool {
    let left = AvlSortedList::from_iter_with(compare::natural(), xs.iter().copied());
    let right = BinarySortedList::from_iter_with(compare::natural(), ys.iter().copied());
    let (mut xs, mut ys) = (xs, ys);
    xs.sort_unstable();
    ys.sort_unstable();
    let same = xs == ys;

    left.has_same_elements_as(&right) == same && right.has_same_elements_as(&left) == same
}

#[quickcheck]
fn filter_and_map_keep_order(xs: Vec<i8>) -> bool {
    let list = AvlSortedList::from_iter_with(compare::natural(), xs.iter().copied());
    let evens = list.filter(|item| item % 2 == 0);
    let negated = list.map(compare::natural(), |item| -i16::from(*item));

    let mut expected_evens: Vec<i8> = xs.iter().copied().filter(|x| x % 2 == 0).collect();
    expected_evens.sort_unstable();
    let mut expected_negated: Vec<i16> = xs.iter().map(|x| -i16::from(*x)).collect();
    expected_negated.sort_unstable();

    evens.to_vec() == expected_evens && negated.to_vec() == expected_negated
}
