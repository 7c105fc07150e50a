use super::*;
use crate::graph::node::{Handle, NodeOpts, instantiate};
use crate::render::rect::{RectNode, RectParams};
use crate::transform::translate::{TranslateNode, TranslateParams};

fn forest(records: Vec<ForestRecord>) -> PageResult<Handle<TransformForest>> {
    instantiate::<TransformForest>(&BuildCtx::default(), NodeOpts::default(), ForestParams::new(records))
}

fn a_with_b() -> Vec<ForestRecord> {
    vec![
        ForestRecord::named("A", ForestRecord::translate(10.0, 0.0, 0.0))
            .with_children([ForestRecord::named("B", ForestRecord::scale(2.0, 2.0, 1.0))]),
    ]
}

#[test]
fn children_accumulate_ancestors() {
    let f = forest(a_with_b()).unwrap();
    let f = f.borrow();
    assert_eq!(f.matrix("A"), Mat4::translate(10.0, 0.0, 0.0));
    assert_eq!(
        f.matrix("B"),
        Mat4::scale(2.0, 2.0, 1.0) * Mat4::translate(10.0, 0.0, 0.0)
    );
    assert_eq!(f.names().collect::<Vec<_>>(), vec!["A", "B"]);
}

#[test]
fn deeper_trees_compose_every_level() {
    let records = vec![
        ForestRecord::named("root", ForestRecord::translate(1.0, 0.0, 0.0)).with_children([
            ForestRecord::named("mid", ForestRecord::scale(2.0, 2.0, 2.0)).with_children([
                ForestRecord::named("leaf", ForestRecord::translate(0.0, 3.0, 0.0)),
            ]),
            ForestRecord::named("sibling", ForestRecord::translate(0.0, 0.0, 4.0)),
        ]),
    ];
    let f = forest(records).unwrap();
    let f = f.borrow();
    let expected = Mat4::translate(0.0, 3.0, 0.0)
        * Mat4::scale(2.0, 2.0, 2.0)
        * Mat4::translate(1.0, 0.0, 0.0);
    assert_eq!(f.matrix("leaf"), expected);
    assert_eq!(
        f.matrix("sibling"),
        Mat4::translate(0.0, 0.0, 4.0) * Mat4::translate(1.0, 0.0, 0.0)
    );
}

#[test]
fn disabled_record_contributes_identity() {
    let records = vec![
        ForestRecord::named("A", ForestRecord::translate(10.0, 0.0, 0.0))
            .with_enable(false)
            .with_children([ForestRecord::named("B", ForestRecord::scale(2.0, 2.0, 1.0))]),
    ];
    let f = forest(records).unwrap();
    assert_eq!(f.borrow().matrix("A"), Mat4::IDENTITY);
    assert_eq!(f.borrow().matrix("B"), Mat4::scale(2.0, 2.0, 1.0));
}

#[test]
fn unknown_name_is_identity() {
    let f = forest(a_with_b()).unwrap();
    assert_eq!(f.borrow().matrix("C"), Mat4::IDENTITY);
    assert!(!f.borrow().contains("C"));
}

#[test]
fn disabled_forest_is_identity() {
    let f = forest(a_with_b()).unwrap();
    f.borrow_mut().base_mut().set_enable(false);
    assert_eq!(f.borrow().matrix("A"), Mat4::IDENTITY);
}

#[test]
fn duplicate_names_are_rejected() {
    let records = vec![
        ForestRecord::named("A", ForestRecord::translate(1.0, 0.0, 0.0))
            .with_children([ForestRecord::named("A", ForestRecord::scale(2.0, 2.0, 1.0))]),
    ];
    let err = forest(records).err().unwrap();
    assert!(matches!(err, PageError::Validation(_)));
    assert!(err.to_string().contains("'A'"));
}

#[test]
fn unnamed_records_get_fresh_names() {
    let records = vec![
        ForestRecord::new(ForestRecord::translate(1.0, 0.0, 0.0)),
        ForestRecord::named("record-2", ForestRecord::translate(2.0, 0.0, 0.0)),
        ForestRecord::new(ForestRecord::translate(3.0, 0.0, 0.0)),
    ];
    let f = forest(records).unwrap();
    let f = f.borrow();
    assert_eq!(
        f.names().collect::<Vec<_>>(),
        vec!["record-1", "record-2", "record-3"]
    );
    assert_eq!(f.matrix("record-2"), Mat4::translate(2.0, 0.0, 0.0));
    assert_eq!(f.matrix("record-3"), Mat4::translate(3.0, 0.0, 0.0));
}

#[test]
fn linked_nodes_feed_the_forest() {
    let ctx = BuildCtx::default();
    let t = instantiate::<TranslateNode>(&ctx, NodeOpts::default(), TranslateParams::new(0.0, 5.0, 0.0))
        .unwrap();
    let r = instantiate::<RectNode>(&ctx, NodeOpts::default(), RectParams::default()).unwrap();
    let records = vec![
        ForestRecord::named("linked", ForestOp::Node(Some(t.as_transform()))),
        ForestRecord::named(
            "pivot",
            ForestOp::PivotPoint {
                x: AnchorX::Right,
                y: AnchorY::Center,
                object: Some(r.as_sized()),
            },
        ),
        ForestRecord::named("unbound", ForestOp::Node(None)),
        ForestRecord::named("literal", ForestOp::Matrix(Some(Mat4::scale(9.0, 9.0, 9.0).into()))),
    ];
    let f = instantiate::<TransformForest>(&ctx, NodeOpts::default(), ForestParams::new(records))
        .unwrap();
    assert_eq!(f.borrow().linked_nodes(), vec![t.id(), r.id()]);
    assert_eq!(f.borrow().matrix("linked"), Mat4::translate(0.0, 5.0, 0.0));
    assert_eq!(f.borrow().matrix("pivot"), Mat4::translate(-100.0, -50.0, 0.0));
    assert_eq!(f.borrow().matrix("unbound"), Mat4::IDENTITY);
    assert_eq!(f.borrow().matrix("literal"), Mat4::scale(9.0, 9.0, 9.0));

    t.borrow_mut().set_xyz(0.0, 6.0, 0.0);
    t.borrow_mut().calculate();
    assert_eq!(f.borrow().matrix("linked"), Mat4::translate(0.0, 5.0, 0.0));
    f.borrow_mut().calculate();
    assert_eq!(f.borrow().matrix("linked"), Mat4::translate(0.0, 6.0, 0.0));
}

#[test]
fn rotate_records_use_degrees_by_default() {
    let records = vec![ForestRecord::named(
        "r",
        ForestOp::Rotate {
            x: 0.0.into(),
            y: 0.0.into(),
            z: 90.0.into(),
            radians: false.into(),
        },
    )];
    let f = forest(records).unwrap();
    let p = f.borrow().matrix("r").mul_vec4([1.0, 0.0, 0.0, 1.0]);
    assert!(p[0].abs() < 1e-12 && (p[1] - 1.0).abs() < 1e-12);
}
