use lifegrid_data::Partition;
use proptest::prelude::*;

prop_compose! {
    fn arb_plan()(size in 1usize..400)(size in Just(size), workers in 1..=size) -> Partition {
        Partition::new(size, workers).unwrap()
    }
}

proptest! {
    #![proptest_config(ProptestConfig { max_global_rejects: 65536, ..ProptestConfig::default() })]

    #[test]
    fn ranges_tile_the_board(plan in arb_plan()) {
        let mut next = 1;
        for rank in 0..plan.workers() {
            let range = plan.range(rank);
            prop_assert_eq!(range.start, next, "gap or overlap before rank {}", rank);
            prop_assert!(range.end >= range.start);
            next = range.end;
        }
        prop_assert_eq!(next, plan.size() + 1);
    }

    #[test]
    fn owner_contains_row(plan in arb_plan(), pick in any::<prop::sample::Index>()) {
        let row = pick.index(plan.size()) + 1;
        let owner = plan.owner_of(row);
        prop_assert!(owner < plan.workers());
        prop_assert!(plan.range(owner).contains(&row));

        // Any other worker computing the same plan agrees.
        let again = Partition::new(plan.size(), plan.workers()).unwrap();
        prop_assert_eq!(again.owner_of(row), owner);
        prop_assert_eq!(plan.local_index(row), row - plan.start_row(owner) + 1);
    }

    #[test]
    fn non_empty_plans_follow_the_ceiling_split(plan in arb_plan()) {
        prop_assume!(plan.first_empty_worker().is_none());
        let chunk = plan.rows_per_worker();
        let last = plan.workers() - 1;
        for rank in 0..last {
            prop_assert_eq!(plan.local_rows(rank), chunk);
            prop_assert_eq!(plan.start_row(rank), rank * chunk + 1);
        }
        prop_assert_eq!(plan.local_rows(last), plan.size() - last * chunk);
    }
}

#[test]
fn lopsided_plan_leaves_tail_empty() {
    let plan = Partition::new(5, 4).unwrap();
    assert_eq!(plan.first_empty_worker(), Some(3));
    assert!(plan.ensure_nonempty().is_err());
    assert_eq!(plan.owner_of(5), 2);
}

#[test]
fn more_workers_than_rows_rejected() {
    assert!(Partition::new(3, 4).is_err());
    assert!(Partition::new(0, 1).is_err());
}
