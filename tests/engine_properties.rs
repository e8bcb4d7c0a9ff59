//! Engine-level properties checked against generated catalogs and orders.

use plank_planner::catalog::{Catalog, MemoryCatalog};
use plank_planner::engine::{OrderRequest, calculate_order_by_size};
use plank_planner::error::{EngineError, ErrorKind};
use plank_planner::types::{
    Dimension, Direction, OrderRequestItem, Piece, Product, ProductPiece,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const PLANK: i64 = 3000;

fn catalog_strategy() -> impl Strategy<Value = MemoryCatalog> {
    let piece = (1u32..=PLANK as u32, prop::sample::select(vec![40u32, 50, 90]), prop::sample::select(vec![20u32, 30]));
    let pieces = prop::collection::vec(piece, 1..8);
    pieces.prop_flat_map(|dims| {
        let n = dims.len() as i64;
        let product = prop::collection::vec((1..=n, 1i64..=6), 1..4);
        let products = prop::collection::vec(product, 1..5);
        (Just(dims), products)
    })
    .prop_map(|(dims, products)| {
        let pieces = dims
            .into_iter()
            .enumerate()
            .map(|(i, (length, width, thickness))| Piece {
                id: i as i64 + 1,
                name: format!("P{}", i + 1),
                length,
                width,
                thickness,
            })
            .collect();
        let products = products
            .into_iter()
            .enumerate()
            .map(|(i, lines)| Product {
                id: i as i64 + 1,
                name: format!("Product {}", i + 1),
                image: None,
                pieces: lines
                    .into_iter()
                    .map(|(piece_id, quantity)| ProductPiece { piece_id, quantity })
                    .collect(),
            })
            .collect();
        MemoryCatalog::new(pieces, products).unwrap()
    })
}

fn order_strategy() -> impl Strategy<Value = (MemoryCatalog, Vec<OrderRequestItem>)> {
    catalog_strategy().prop_flat_map(|catalog| {
        let n = catalog.product_count() as i64;
        let items = prop::collection::vec(
            (1..=n, 1i64..=20).prop_map(|(product_id, quantity)| OrderRequestItem {
                product_id,
                quantity,
            }),
            0..6,
        );
        (Just(catalog), items)
    })
}

fn request(products: Vec<OrderRequestItem>) -> OrderRequest {
    OrderRequest {
        order: Direction::Asc,
        sort_by: vec![Dimension::X, Dimension::Y, Dimension::Z],
        plank_size: PLANK,
        kerf: 0,
        layout: true,
        products,
    }
}

fn expected_total(catalog: &MemoryCatalog, items: &[OrderRequestItem]) -> u64 {
    items
        .iter()
        .map(|item| {
            let product = catalog.product(item.product_id).unwrap();
            product
                .pieces
                .iter()
                .map(|pp| (pp.quantity * item.quantity) as u64)
                .sum::<u64>()
        })
        .sum()
}

proptest! {
    #[test]
    fn conservation((catalog, items) in order_strategy()) {
        let resp = calculate_order_by_size(&request(items.clone()), &catalog).unwrap();
        let grouped: u64 = resp
            .order
            .iter()
            .flat_map(|g| &g.details)
            .map(|s| s.total_quantity)
            .sum();
        prop_assert_eq!(grouped, expected_total(&catalog, &items));

        let summarized: u64 = resp.requested_products.iter().map(|p| p.total_quantity).sum();
        prop_assert_eq!(summarized, grouped);
    }

    #[test]
    fn order_independence(
        (catalog, items, shuffled) in order_strategy().prop_flat_map(|(catalog, items)| {
            let shuffled = Just(items.clone()).prop_shuffle();
            (Just(catalog), Just(items), shuffled)
        })
    ) {
        let a = calculate_order_by_size(&request(items), &catalog).unwrap();
        let b = calculate_order_by_size(&request(shuffled), &catalog).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn planks_cover_total_length((catalog, items) in order_strategy()) {
        let resp = calculate_order_by_size(&request(items), &catalog).unwrap();
        for gauge in &resp.order {
            let length: u64 = gauge
                .details
                .iter()
                .map(|s| s.x as u64 * s.total_quantity)
                .sum();
            prop_assert!(gauge.planks_needed >= length.div_ceil(PLANK as u64));
            let runs = gauge.planks.as_ref().unwrap();
            prop_assert_eq!(runs.iter().map(|r| r.count).sum::<u64>(), gauge.planks_needed);
            prop_assert_eq!(gauge.item_count, gauge.details.len());
        }
    }

    #[test]
    fn direction_reverses_and_sort_keeps_planks((catalog, items) in order_strategy()) {
        let asc = calculate_order_by_size(&request(items.clone()), &catalog).unwrap();

        let mut desc_req = request(items.clone());
        desc_req.order = Direction::Desc;
        let desc = calculate_order_by_size(&desc_req, &catalog).unwrap();

        let mut reversed = asc.order.clone();
        reversed.reverse();
        for g in &mut reversed {
            g.details.reverse();
        }
        prop_assert_eq!(&desc.order, &reversed);

        let mut zyx_req = request(items);
        zyx_req.sort_by = vec![Dimension::Z, Dimension::Y, Dimension::X];
        let zyx = calculate_order_by_size(&zyx_req, &catalog).unwrap();
        let planks = |order: &[plank_planner::assemble::GaugeResponse]| {
            let mut v: Vec<_> = order.iter().map(|g| (g.y, g.z, g.planks_needed)).collect();
            v.sort();
            v
        };
        prop_assert_eq!(planks(&asc.order), planks(&zyx.order));
    }
}

fn table_catalog(top_length: u32) -> MemoryCatalog {
    MemoryCatalog::new(
        vec![
            Piece { id: 1, name: "Rail".into(), length: 2900, width: 70, thickness: 20 },
            Piece { id: 2, name: "Cleat".into(), length: 100, width: 70, thickness: 20 },
            Piece { id: 3, name: "Top".into(), length: top_length, width: 70, thickness: 20 },
        ],
        vec![
            Product {
                id: 1,
                name: "Frame".into(),
                image: Some("frame.jpg".into()),
                pieces: vec![
                    ProductPiece { piece_id: 1, quantity: 1 },
                    ProductPiece { piece_id: 2, quantity: 1 },
                ],
            },
            Product {
                id: 2,
                name: "Board".into(),
                image: None,
                pieces: vec![ProductPiece { piece_id: 3, quantity: 1 }],
            },
        ],
    )
    .unwrap()
}

#[test]
fn complementary_pieces_share_one_plank() {
    let catalog = table_catalog(3500);
    let resp = calculate_order_by_size(
        &request(vec![OrderRequestItem { product_id: 1, quantity: 1 }]),
        &catalog,
    )
    .unwrap();
    assert_eq!(resp.order.len(), 1);
    assert_eq!(resp.order[0].planks_needed, 1);
    assert_eq!(resp.order[0].item_count, 2);
    assert_eq!(resp.requested_products[0].image.as_deref(), Some("frame.jpg"));
    assert_eq!(resp.requested_products[0].pieces, 2);
}

#[test]
fn oversized_piece_aborts_the_whole_calculation() {
    let catalog = table_catalog(3500);
    let err = calculate_order_by_size(
        &request(vec![
            OrderRequestItem { product_id: 1, quantity: 1 },
            OrderRequestItem { product_id: 2, quantity: 1 },
        ]),
        &catalog,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PieceExceedsStock);
    assert_eq!(
        err,
        EngineError::PieceExceedsStock {
            length: 3500,
            width: 70,
            thickness: 20,
            plank_length: 3000,
        }
    );
}

#[test]
fn response_json_shape() {
    let catalog = table_catalog(3000);
    let mut req = request(vec![OrderRequestItem { product_id: 1, quantity: 2 }]);
    req.layout = false;
    let resp = calculate_order_by_size(&req, &catalog).unwrap();
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "requested_products": [
                {"product": "Frame", "image": "frame.jpg", "total_quantity": 4, "pieces": 2}
            ],
            "order": [{
                "y": 70, "z": 20, "planks_needed": 2, "item_count": 2,
                "details": [
                    {"x": 100, "y": 70, "z": 20, "total_quantity": 2, "details": [
                        {"product": "Frame", "piece": "Cleat", "quantity": 1,
                         "product_quantity": 2, "total_quantity": 2}
                    ]},
                    {"x": 2900, "y": 70, "z": 20, "total_quantity": 2, "details": [
                        {"product": "Frame", "piece": "Rail", "quantity": 1,
                         "product_quantity": 2, "total_quantity": 2}
                    ]}
                ]
            }]
        })
    );
}
