#[macro_use]
extern crate quickcheck_macros;

mod graphs;
mod sorted_lists;

use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// sorted lists in a quicktest.
#[derive(Copy, Clone, Debug)]
enum Op<T> {
    /// Add the value to the list
    Add(T),
    /// Remove one occurrence of the value from the list
    Remove(T),
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation.
    /// Adds are twice as likely so lists actually grow.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1]).unwrap() {
            0 => Op::Add(T::arbitrary(g)),
            _ => Op::Remove(T::arbitrary(g)),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Op::Add(value) => Box::new(value.shrink().map(Op::Add)),
            Op::Remove(value) => Box::new(value.shrink().map(Op::Remove)),
        }
    }
}

/// A directed edge between two of a small number of nodes.
#[derive(Copy, Clone, Debug)]
struct Edge(usize, usize);

impl Edge {
    const NODES: usize = 6;
}

impl Arbitrary for Edge {
    fn arbitrary(g: &mut Gen) -> Self {
        Edge(
            usize::arbitrary(g) % Self::NODES,
            usize::arbitrary(g) % Self::NODES,
        )
    }
}
