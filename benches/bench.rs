use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use classic_ds::{compare, AvlSortedList, BinarySortedList, SortedArray, SortedList};

#[derive(Clone)]
enum ListEnum<T> {
    Avl(AvlSortedList<T>),
    Binary(BinarySortedList<T>),
    Array(SortedArray<T>),
}

impl<T> ListEnum<T> {
    fn find(&self, value: &T) -> Option<&T> {
        match self {
            Self::Avl(l) => l.find(value),
            Self::Binary(l) => l.find(value),
            Self::Array(l) => l.find(value),
        }
    }

    fn add(&mut self, value: T) {
        match self {
            Self::Avl(l) => {
                l.add(value);
            }
            Self::Binary(l) => {
                SortedList::add(l, value);
            }
            Self::Array(l) => {
                SortedList::add(l, value);
            }
        }
    }

    fn remove(&mut self, value: &T) {
        match self {
            Self::Avl(l) => {
                l.remove(value);
            }
            Self::Binary(l) => {
                l.remove(value);
            }
            Self::Array(l) => {
                l.remove(value);
            }
        }
    }
}

/// Helper to bench a function on a sorted list.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// implementations of sorted lists before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut ListEnum<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_items = 2usize.pow(num_levels as u32) - 1;
        let largest_item = num_items as i32 - 1;

        // The unbalanced tree degrades to a linked list on sorted input, so every list gets
        // the same shuffled input.
        let mut items: Vec<i32> = (0..=largest_item).collect();
        items.shuffle(&mut StdRng::seed_from_u64(num_levels));

        let list_tests = [
            (
                "avl",
                ListEnum::Avl(AvlSortedList::from_iter_with(
                    compare::natural(),
                    items.iter().copied(),
                )),
            ),
            (
                "binary",
                ListEnum::Binary(BinarySortedList::from_iter_with(
                    compare::natural(),
                    items.iter().copied(),
                )),
            ),
            (
                "array",
                ListEnum::Array(SortedArray::from_iter_with(
                    compare::natural(),
                    items.iter().copied(),
                )),
            ),
        ];
        for (name, list) in list_tests {
            let id = BenchmarkId::new(name, largest_item);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut list = black_box(list.clone());
                        let instant = std::time::Instant::now();
                        f(&mut list, black_box(largest_item));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "find", |list, i| {
        let _value = black_box(list.find(&i));
    });
    bench_helper(c, "remove", |list, i| {
        list.remove(&i);
    });

    bench_helper(c, "add", |list, i| {
        list.add(i + 1);
    });

    bench_helper(c, "find-miss", |list, i| {
        let _value = black_box(list.find(&(i + 1)));
    });
    bench_helper(c, "remove-miss", |list, i| {
        list.remove(&(i + 1));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
