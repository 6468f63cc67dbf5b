use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizij_pose_core::{
    BlendTreeBuilder, Channel, ChannelCatalog, Config, HumanoidRig, PoseSnapshot, Rig, RootPart,
    Value, WriteBatch,
};

// Every catalog channel present in both poses, so the whole standard layout is built.
fn pose(catalog: &ChannelCatalog, name: &str, v: f32) -> PoseSnapshot {
    let mut snap = PoseSnapshot::new(name)
        .with_root_position([0.0, v, 0.0])
        .with_root_rotation([0.0, (v * 0.5).sin(), 0.0, (v * 0.5).cos()]);
    for ch in catalog.iter() {
        if let Channel::SkeletalJoint { .. } = ch {
            snap.set(ch.clone(), Value::Float(v));
        }
    }
    snap
}

fn standard() -> (Rig, PoseSnapshot, PoseSnapshot) {
    let rig = Rig::new("bench").with_humanoid(HumanoidRig::standard());
    let catalog = ChannelCatalog::from_rig(&rig);
    let a = pose(&catalog, "a", 0.0);
    let b = pose(&catalog, "b", 1.0);
    (rig, a, b)
}

fn bench_build(c: &mut Criterion) {
    let (rig, a, b) = standard();
    let cfg = Config::default();

    c.bench_function("build_standard_tree", |bch| {
        bch.iter(|| {
            let tree = BlendTreeBuilder::new(&rig, &cfg)
                .build(Some(black_box(&a)), Some(black_box(&b)))
                .unwrap();
            black_box(tree.len())
        })
    });
}

fn bench_set_subtree(c: &mut Criterion) {
    let (rig, a, b) = standard();
    let cfg = Config::default();
    let mut tree = BlendTreeBuilder::new(&rig, &cfg)
        .build(Some(&a), Some(&b))
        .unwrap();
    let root = tree.root();
    let left_hand = tree.find("Skeletal/Left Hand").unwrap();
    assert!(tree.leaf_location(&Channel::root(RootPart::Rotation)).is_some());

    c.bench_function("set_subtree_root", |bch| {
        bch.iter(|| {
            let mut batch = WriteBatch::with_capacity(256);
            black_box(tree.set_subtree(root, black_box(0.5), false, &mut batch))
        })
    });

    c.bench_function("set_subtree_hand_mirrored", |bch| {
        bch.iter(|| {
            let mut batch = WriteBatch::with_capacity(256);
            black_box(tree.set_subtree(left_hand, black_box(0.3), true, &mut batch))
        })
    });
}

criterion_group!(benches, bench_build, bench_set_subtree);
criterion_main!(benches);
