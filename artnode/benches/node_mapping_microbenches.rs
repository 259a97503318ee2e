/// Microbenches for the child mappings behind each node representation.
/// Set ARTNODE_BENCH_FULL=1 for the long profile.
use std::collections::HashSet;
use std::time::{Duration, Instant};

use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use artnode::mapping::NodeMapping;
use artnode::mapping::direct_mapping::DirectMapping;
use artnode::mapping::indexed_mapping::IndexedMapping;
use artnode::mapping::sorted_keyed_mapping::SortedKeyedMapping;
use artnode::utils::bitset::{Bitset8, Bitset16, Bitset32, Bitset64, BitsetTrait};

type Indexed48 = IndexedMapping<u64, 48, Bitset64<1>>;

fn full_bench_profile() -> bool {
    std::env::var("ARTNODE_BENCH_FULL").as_deref() == Ok("1")
}

fn microbench_sample_size() -> usize {
    if full_bench_profile() { 4096 } else { 256 }
}

fn microbench_measurement_time() -> Duration {
    if full_bench_profile() {
        Duration::from_secs(10)
    } else {
        Duration::from_secs(2)
    }
}

fn filled_sets<const WIDTH: usize, MappingType>(iters: u64) -> Vec<(MappingType, Vec<u8>)>
where
    MappingType: NodeMapping<u64, WIDTH> + Default,
{
    let mut mapping_set = make_mapping_sets::<WIDTH, MappingType>(iters);
    for (mapping, child_set) in &mut mapping_set {
        for child in child_set {
            mapping.add_child(*child, 0u64);
        }
    }
    mapping_set
}

fn benched_grow_sorted<const FROM_WIDTH: usize, const TO_WIDTH: usize>(iters: u64) -> Duration {
    let mut mapping_set = filled_sets::<FROM_WIDTH, SortedKeyedMapping<u64, FROM_WIDTH>>(iters);

    let start = Instant::now();
    for (mapping, _child_set) in &mut mapping_set {
        let _new: SortedKeyedMapping<u64, TO_WIDTH> = SortedKeyedMapping::from_resized(mapping);
    }
    start.elapsed()
}

fn benched_grow_sorted_to_indexed<const FROM_WIDTH: usize, ToBitset: BitsetTrait>(
    iters: u64,
) -> Duration {
    let mut mapping_set = filled_sets::<FROM_WIDTH, SortedKeyedMapping<u64, FROM_WIDTH>>(iters);

    let start = Instant::now();
    for (mapping, _child_set) in &mut mapping_set {
        let _new: IndexedMapping<u64, 48, ToBitset> = IndexedMapping::from_sorted_keyed(mapping);
    }
    start.elapsed()
}

fn bench_grow_indexed_to_direct(iters: u64) -> Duration {
    let mut mapping_set = filled_sets::<48, Indexed48>(iters);

    let start = Instant::now();
    for (mapping, _child_set) in &mut mapping_set {
        let _new: DirectMapping<u64> = DirectMapping::from_indexed(mapping);
    }
    start.elapsed()
}

fn benched_add_child<const WIDTH: usize, MappingType>(iters: u64) -> Duration
where
    MappingType: NodeMapping<u64, WIDTH> + Default,
{
    let mut mapping_set = make_mapping_sets::<WIDTH, MappingType>(iters);
    let start = Instant::now();
    for (mapping, child_set) in &mut mapping_set {
        for child in child_set {
            mapping.add_child(*child, 0u64);
        }
    }
    start.elapsed()
}

fn benched_del_child<const WIDTH: usize, MappingType>(iters: u64) -> Duration
where
    MappingType: NodeMapping<u64, WIDTH> + Default,
{
    let mut mapping_set = filled_sets::<WIDTH, MappingType>(iters);

    // Time the deletion only.
    let start = Instant::now();
    for (mapping, child_set) in &mut mapping_set {
        for child in child_set {
            mapping.delete_child(*child);
        }
    }
    start.elapsed()
}

fn benched_seek_child<const WIDTH: usize, MappingType>(iters: u64) -> Duration
where
    MappingType: NodeMapping<u64, WIDTH> + Default,
{
    let mapping_set = filled_sets::<WIDTH, MappingType>(iters);

    let start = Instant::now();
    for (mapping, child_set) in &mapping_set {
        for child in child_set {
            std::hint::black_box(mapping.seek_child(*child));
        }
    }
    start.elapsed()
}

fn benched_next_key<const WIDTH: usize, MappingType>(iters: u64) -> Duration
where
    MappingType: NodeMapping<u64, WIDTH> + Default,
{
    let mapping_set = filled_sets::<WIDTH, MappingType>(iters);

    let start = Instant::now();
    for (mapping, child_set) in &mapping_set {
        for child in child_set {
            std::hint::black_box(mapping.next_key(child.wrapping_add(1)));
        }
    }
    start.elapsed()
}

fn make_mapping_sets<const WIDTH: usize, MappingType>(iters: u64) -> Vec<(MappingType, Vec<u8>)>
where
    MappingType: NodeMapping<u64, WIDTH> + Default,
{
    // Break iters into WIDTH-sized chunks, with a mapping and a child set for each.
    let chunks = (iters / (WIDTH as u64)).max(1);
    let mut mapping_set = Vec::with_capacity(chunks as usize);
    for _ in 0..chunks {
        // A random set of unique child keys, WIDTH wide.
        let mut child_hash_set = HashSet::with_capacity(WIDTH);
        while child_hash_set.len() < WIDTH {
            child_hash_set.insert(rand::random::<u8>());
        }
        let child_set = child_hash_set.into_iter().collect::<Vec<u8>>();
        mapping_set.push((MappingType::default(), child_set));
    }
    mapping_set
}

pub fn grow_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("grow_node");
    group.throughput(Throughput::Elements(1));
    group.sample_size(microbench_sample_size());
    group.measurement_time(microbench_measurement_time());

    group.bench_function("n4_to_n16", |b| {
        b.iter_custom(benched_grow_sorted::<4, 16>)
    });
    group.bench_function("n16_to_n48_64x1", |b| {
        b.iter_custom(benched_grow_sorted_to_indexed::<16, Bitset64<1>>)
    });
    group.bench_function("n16_to_n48_16x3", |b| {
        b.iter_custom(benched_grow_sorted_to_indexed::<16, Bitset16<3>>)
    });
    group.bench_function("n48_to_n256", |b| {
        b.iter_custom(bench_grow_indexed_to_direct)
    });

    group.finish();
}

pub fn add_child(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_child");
    group.throughput(Throughput::Elements(1));
    group.sample_size(microbench_sample_size());
    group.measurement_time(microbench_measurement_time());

    group.bench_function("direct", |b| {
        b.iter_custom(benched_add_child::<256, DirectMapping<u64>>)
    });
    group.bench_function("indexed48_64x1", |b| {
        b.iter_custom(benched_add_child::<48, Indexed48>)
    });
    group.bench_function("indexed48_8x6", |b| {
        b.iter_custom(benched_add_child::<48, IndexedMapping<u64, 48, Bitset8<6>>>)
    });
    group.bench_function("indexed48_32x2", |b| {
        b.iter_custom(benched_add_child::<48, IndexedMapping<u64, 48, Bitset32<2>>>)
    });
    group.bench_function("sorted_keyed16", |b| {
        b.iter_custom(benched_add_child::<16, SortedKeyedMapping<u64, 16>>)
    });
    group.bench_function("sorted_keyed4", |b| {
        b.iter_custom(benched_add_child::<4, SortedKeyedMapping<u64, 4>>)
    });

    group.finish();
}

pub fn del_child(c: &mut Criterion) {
    let mut group = c.benchmark_group("del_child");
    group.throughput(Throughput::Elements(1));
    group.sample_size(microbench_sample_size());
    group.measurement_time(microbench_measurement_time());

    group.bench_function("direct", |b| {
        b.iter_custom(benched_del_child::<256, DirectMapping<u64>>)
    });
    group.bench_function("indexed48_64x1", |b| {
        b.iter_custom(benched_del_child::<48, Indexed48>)
    });
    group.bench_function("sorted_keyed16", |b| {
        b.iter_custom(benched_del_child::<16, SortedKeyedMapping<u64, 16>>)
    });
    group.bench_function("sorted_keyed4", |b| {
        b.iter_custom(benched_del_child::<4, SortedKeyedMapping<u64, 4>>)
    });

    group.finish();
}

pub fn seek_child(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek_child");
    group.throughput(Throughput::Elements(1));
    group.sample_size(microbench_sample_size());
    group.measurement_time(microbench_measurement_time());

    group.bench_function("direct", |b| {
        b.iter_custom(benched_seek_child::<256, DirectMapping<u64>>)
    });
    group.bench_function("indexed48_64x1", |b| {
        b.iter_custom(benched_seek_child::<48, Indexed48>)
    });
    group.bench_function("sorted_keyed16", |b| {
        b.iter_custom(benched_seek_child::<16, SortedKeyedMapping<u64, 16>>)
    });
    group.bench_function("sorted_keyed4", |b| {
        b.iter_custom(benched_seek_child::<4, SortedKeyedMapping<u64, 4>>)
    });

    group.finish();
}

pub fn next_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_key");
    group.throughput(Throughput::Elements(1));
    group.sample_size(microbench_sample_size());
    group.measurement_time(microbench_measurement_time());

    group.bench_function("direct", |b| {
        b.iter_custom(benched_next_key::<256, DirectMapping<u64>>)
    });
    group.bench_function("indexed48_64x1", |b| {
        b.iter_custom(benched_next_key::<48, Indexed48>)
    });
    group.bench_function("sorted_keyed16", |b| {
        b.iter_custom(benched_next_key::<16, SortedKeyedMapping<u64, 16>>)
    });

    group.finish();
}

criterion_group!(benches, grow_node, add_child, del_child, seek_child, next_key);
criterion_main!(benches);
