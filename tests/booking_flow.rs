//! End-to-end allocation scenarios through the service layer.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use freight_exchange::application::error::{ApplicationResult, ErrorKind};
use freight_exchange::application::services::{
    CreateLoad, FreightServices, LoadLifecycle, RegisterTransporter, SubmitBid,
    WeightedScoreStrategy,
};
use freight_exchange::domain::entities::{
    Bid, Booking, Load, Transporter, TruckPool, TruckAvailability,
};
use freight_exchange::domain::value_objects::{
    BidId, BidStatus, BookingId, BookingStatus, LoadId, LoadStatus, Rate, TransporterId,
    TruckType, WeightUnit,
};
use freight_exchange::infrastructure::persistence::{
    BidFilter, BidRepository, BookingRepository, ChangeSet, FreightStore, InMemoryFreightStore,
    LoadFilter, LoadRepository, Page, PageRequest, RepositoryResult, TransporterRepository,
};
use async_trait::async_trait;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn large() -> TruckType {
    TruckType::new("LARGE").unwrap()
}

async fn post_load(services: &FreightServices, trucks: u32) -> Load {
    services
        .loads
        .create(CreateLoad {
            shipper_id: "shipper-9".to_string(),
            loading_city: "Nagpur".to_string(),
            unloading_city: "Chennai".to_string(),
            product_type: "Cement".to_string(),
            truck_type: "Large".to_string(),
            no_of_trucks: trucks,
            weight: 40.0,
            weight_unit: WeightUnit::Ton,
            comment: Some("fragile".to_string()),
            loading_date: None,
        })
        .await
        .unwrap()
}

async fn register(services: &FreightServices, name: &str, rating: f64, large: u32) -> Transporter {
    services
        .transporters
        .register(RegisterTransporter {
            company_name: name.to_string(),
            rating,
            trucks: vec![("LARGE".to_string(), large)],
        })
        .await
        .unwrap()
}

async fn bid(
    services: &FreightServices,
    load_id: LoadId,
    transporter_id: TransporterId,
    rate: f64,
    trucks: u32,
) -> ApplicationResult<Bid> {
    services
        .bids
        .submit_bid(SubmitBid {
            load_id,
            transporter_id,
            proposed_rate: Rate::from_f64(rate).unwrap(),
            trucks_offered: trucks,
        })
        .await
}

async fn large_pool(services: &FreightServices, id: TransporterId) -> u32 {
    services.transporters.get(id).await.unwrap().available(&large())
}

async fn confirmed_allocation(services: &FreightServices, load_id: LoadId) -> u32 {
    services
        .bookings
        .for_load(load_id)
        .await
        .unwrap()
        .iter()
        .filter(|b| b.status() == BookingStatus::Confirmed)
        .map(|b| b.allocated_trucks())
        .sum()
}

#[tokio::test]
async fn book_fill_and_reopen() {
    let services = FreightServices::in_memory();
    let load = post_load(&services, 10).await;
    let first = register(&services, "Northline", 4.5, 20).await;
    let second = register(&services, "Southline", 3.5, 20).await;

    let bid_one = bid(&services, load.id(), first.id(), 100.0, 5).await.unwrap();
    let booking_one = services.bookings.accept_bid(bid_one.id()).await.unwrap();

    let after_first = services.loads.get(load.id()).await.unwrap();
    assert_eq!(after_first.remaining_trucks(), 5);
    assert_eq!(after_first.status(), LoadStatus::OpenForBids);
    assert_eq!(large_pool(&services, first.id()).await, 15);
    assert_eq!(booking_one.final_rate(), bid_one.proposed_rate());

    let bid_two = bid(&services, load.id(), second.id(), 120.0, 5).await.unwrap();
    services.bookings.accept_bid(bid_two.id()).await.unwrap();

    let full = services.loads.get(load.id()).await.unwrap();
    assert_eq!(full.remaining_trucks(), 0);
    assert_eq!(full.status(), LoadStatus::Booked);

    services.bookings.cancel_booking(booking_one.id()).await.unwrap();

    let reopened = services.loads.get(load.id()).await.unwrap();
    assert_eq!(reopened.remaining_trucks(), 5);
    assert_eq!(reopened.status(), LoadStatus::OpenForBids);
    assert_eq!(large_pool(&services, first.id()).await, 20);
    assert_eq!(large_pool(&services, second.id()).await, 15);

    let again = services.bookings.cancel_booking(booking_one.id()).await.unwrap_err();
    assert_eq!(again.kind(), ErrorKind::InvalidTransition);
    assert_eq!(large_pool(&services, first.id()).await, 20);
}

#[tokio::test]
async fn first_bid_opens_load_once() {
    let services = FreightServices::in_memory();
    let load = post_load(&services, 6).await;
    let carrier = register(&services, "Eastline", 4.0, 10).await;

    bid(&services, load.id(), carrier.id(), 90.0, 2).await.unwrap();
    let opened = services.loads.get(load.id()).await.unwrap();
    assert_eq!(opened.status(), LoadStatus::OpenForBids);

    bid(&services, load.id(), carrier.id(), 95.0, 2).await.unwrap();
    let still_open = services.loads.get(load.id()).await.unwrap();
    assert_eq!(still_open.status(), LoadStatus::OpenForBids);
    assert_eq!(still_open.version(), opened.version());
}

#[tokio::test]
async fn bidding_does_not_reserve_trucks() {
    let services = FreightServices::in_memory();
    let load = post_load(&services, 4).await;
    let carrier = register(&services, "Westline", 4.0, 4).await;

    bid(&services, load.id(), carrier.id(), 90.0, 4).await.unwrap();
    assert_eq!(large_pool(&services, carrier.id()).await, 4);
}

#[tokio::test]
async fn bids_refused_on_closed_loads() {
    let services = FreightServices::in_memory();
    let carrier = register(&services, "Midline", 4.0, 20).await;

    let cancelled = post_load(&services, 3).await;
    services.loads.cancel(cancelled.id()).await.unwrap();
    let err = bid(&services, cancelled.id(), carrier.id(), 80.0, 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    let booked = post_load(&services, 2).await;
    let b = bid(&services, booked.id(), carrier.id(), 80.0, 2).await.unwrap();
    services.bookings.accept_bid(b.id()).await.unwrap();
    let err = bid(&services, booked.id(), carrier.id(), 80.0, 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    let err = services.loads.cancel(booked.id()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
}

/// Store that cancels a chosen load right before the next commit carrying a bid.
#[derive(Debug, Default)]
struct CancelBeforeBidCommit {
    inner: InMemoryFreightStore,
    target: Mutex<Option<LoadId>>,
}

#[async_trait]
impl LoadRepository for CancelBeforeBidCommit {
    async fn get_load(&self, id: &LoadId) -> RepositoryResult<Option<Load>> {
        self.inner.get_load(id).await
    }

    async fn find_loads(
        &self,
        filter: &LoadFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<Load>> {
        self.inner.find_loads(filter, page).await
    }
}

#[async_trait]
impl TransporterRepository for CancelBeforeBidCommit {
    async fn get_transporter(&self, id: &TransporterId) -> RepositoryResult<Option<Transporter>> {
        self.inner.get_transporter(id).await
    }

    async fn list_transporters(&self) -> RepositoryResult<Vec<Transporter>> {
        self.inner.list_transporters().await
    }
}

#[async_trait]
impl BidRepository for CancelBeforeBidCommit {
    async fn get_bid(&self, id: &BidId) -> RepositoryResult<Option<Bid>> {
        self.inner.get_bid(id).await
    }

    async fn find_bids(&self, filter: &BidFilter) -> RepositoryResult<Vec<Bid>> {
        self.inner.find_bids(filter).await
    }
}

#[async_trait]
impl BookingRepository for CancelBeforeBidCommit {
    async fn get_booking(&self, id: &BookingId) -> RepositoryResult<Option<Booking>> {
        self.inner.get_booking(id).await
    }

    async fn find_bookings_by_load(&self, load_id: &LoadId) -> RepositoryResult<Vec<Booking>> {
        self.inner.find_bookings_by_load(load_id).await
    }

    async fn find_bookings_by_transporter(
        &self,
        transporter_id: &TransporterId,
    ) -> RepositoryResult<Vec<Booking>> {
        self.inner.find_bookings_by_transporter(transporter_id).await
    }
}

#[async_trait]
impl FreightStore for CancelBeforeBidCommit {
    async fn commit(&self, changes: ChangeSet) -> RepositoryResult<()> {
        let target = if changes.bids.is_empty() {
            None
        } else {
            self.target.lock().unwrap().take()
        };
        if let Some(load_id) = target {
            LoadLifecycle::new(Arc::new(self.inner.clone()))
                .cancel(load_id)
                .await
                .unwrap();
        }
        self.inner.commit(changes).await
    }
}

#[tokio::test]
async fn cancel_landing_mid_bid_fails_the_bid() {
    let store = Arc::new(CancelBeforeBidCommit::default());
    let services = FreightServices::new(store.clone(), Arc::new(WeightedScoreStrategy::default()));
    let load = post_load(&services, 4).await;
    let carrier = register(&services, "Lateline", 4.0, 10).await;

    let first = bid(&services, load.id(), carrier.id(), 100.0, 2).await.unwrap();
    assert_eq!(
        services.loads.get(load.id()).await.unwrap().status(),
        LoadStatus::OpenForBids
    );

    *store.target.lock().unwrap() = Some(load.id());
    let err = bid(&services, load.id(), carrier.id(), 95.0, 2).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(
        services.loads.get(load.id()).await.unwrap().status(),
        LoadStatus::Cancelled
    );
    let bids = services.bids.list(&BidFilter::for_load(load.id())).await.unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].id(), first.id());
}

#[tokio::test]
async fn stale_bid_is_refused_without_touching_the_pool() {
    let services = FreightServices::in_memory();
    let load = post_load(&services, 5).await;
    let early = register(&services, "Early", 4.0, 10).await;
    let late = register(&services, "Late", 4.0, 10).await;

    let big = bid(&services, load.id(), late.id(), 100.0, 4).await.unwrap();
    let small = bid(&services, load.id(), early.id(), 100.0, 3).await.unwrap();
    services.bookings.accept_bid(small.id()).await.unwrap();

    let err = services.bookings.accept_bid(big.id()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    assert_eq!(large_pool(&services, late.id()).await, 10);
    assert_eq!(services.bids.get(big.id()).await.unwrap().status(), BidStatus::Pending);
    assert_eq!(services.loads.get(load.id()).await.unwrap().remaining_trucks(), 2);
}

#[tokio::test]
async fn shrunken_pool_fails_acceptance() {
    let services = FreightServices::in_memory();
    let load = post_load(&services, 5).await;
    let carrier = register(&services, "Shrinking", 4.0, 5).await;
    let offer = bid(&services, load.id(), carrier.id(), 100.0, 5).await.unwrap();

    let pool = TruckPool::new(vec![TruckAvailability::new(large(), 2)]).unwrap();
    services.ledger.replace_all(carrier.id(), pool).await.unwrap();

    let err = services.bookings.accept_bid(offer.id()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientCapacity);
    assert_eq!(large_pool(&services, carrier.id()).await, 2);
    assert_eq!(services.loads.get(load.id()).await.unwrap().remaining_trucks(), 5);
    assert!(services.bookings.for_load(load.id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn ranking_uses_exact_weighted_scores() {
    let services = FreightServices::in_memory();
    let load = post_load(&services, 10).await;
    let a = register(&services, "Rated4", 4.0, 10).await;
    let b = register(&services, "Rated5", 5.0, 10).await;
    let c = register(&services, "Rated3", 3.0, 10).await;

    let bid_a = bid(&services, load.id(), a.id(), 500.0, 1).await.unwrap();
    let bid_b = bid(&services, load.id(), b.id(), 600.0, 1).await.unwrap();
    let bid_c = bid(&services, load.id(), c.id(), 400.0, 1).await.unwrap();

    let ranked = services.ranking.rank_bids(load.id()).await.unwrap();
    assert_eq!(ranked.len(), 3);

    assert_eq!(ranked[0].bid.id(), bid_b.id());
    assert!((ranked[0].score - 0.301_166_666_666_666_7).abs() < 1e-12);
    assert_eq!(ranked[1].bid.id(), bid_a.id());
    assert!((ranked[1].score - 0.2414).abs() < 1e-12);
    assert_eq!(ranked[2].bid.id(), bid_c.id());
    assert!((ranked[2].score - 0.18175).abs() < 1e-12);
    assert_eq!(
        ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_acceptances_never_over_allocate() {
    let services = FreightServices::in_memory();
    let load = post_load(&services, 10).await;

    let mut carriers = Vec::new();
    let mut bids = Vec::new();
    for i in 0..8 {
        let carrier = register(&services, &format!("Racer {i}"), 4.0, 20).await;
        bids.push(bid(&services, load.id(), carrier.id(), 100.0, 3).await.unwrap());
        carriers.push(carrier);
    }

    let handles: Vec<_> = bids
        .iter()
        .map(|b| {
            let services = services.clone();
            let bid_id = b.id();
            tokio::spawn(async move { services.bookings.accept_bid(bid_id).await })
        })
        .collect();

    let mut confirmed = 0;
    for result in futures::future::join_all(handles).await {
        match result.unwrap() {
            Ok(_) => confirmed += 1,
            Err(e) => assert!(
                matches!(e.kind(), ErrorKind::Conflict | ErrorKind::InvalidTransition),
                "unexpected failure: {e}"
            ),
        }
    }
    assert!(confirmed >= 1);

    let final_load = services.loads.get(load.id()).await.unwrap();
    let allocated = confirmed_allocation(&services, load.id()).await;
    assert!(allocated <= 10);
    assert_eq!(final_load.remaining_trucks(), 10 - allocated);
    assert_eq!(allocated, confirmed * 3);

    for carrier in &carriers {
        let held: u32 = services
            .bookings
            .for_transporter(carrier.id())
            .await
            .unwrap()
            .iter()
            .map(|b| b.allocated_trucks())
            .sum();
        assert_eq!(large_pool(&services, carrier.id()).await, 20 - held);
    }
}

#[derive(Debug, Clone)]
enum Step {
    Accept { carrier: usize, trucks: u32 },
    Cancel(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..3, 1u32..5).prop_map(|(carrier, trucks)| Step::Accept { carrier, trucks }),
        (0usize..8).prop_map(Step::Cancel),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn remaining_trucks_track_confirmed_bookings(
        no_of_trucks in 1u32..12,
        steps in prop::collection::vec(step(), 1..16),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let services = FreightServices::in_memory();
            let load = post_load(&services, no_of_trucks).await;
            let mut carriers = Vec::new();
            for i in 0..3 {
                carriers.push(register(&services, &format!("Prop {i}"), 3.0, 10).await);
            }
            let mut bookings = Vec::new();

            for step in steps {
                match step {
                    Step::Accept { carrier, trucks } => {
                        let carrier = &carriers[carrier];
                        if let Ok(b) = bid(&services, load.id(), carrier.id(), 75.0, trucks).await {
                            if let Ok(booking) = services.bookings.accept_bid(b.id()).await {
                                bookings.push(booking.id());
                            }
                        }
                    }
                    Step::Cancel(index) => {
                        if let Some(id) = bookings.get(index) {
                            let _ = services.bookings.cancel_booking(*id).await;
                        }
                    }
                }

                let current = services.loads.get(load.id()).await.unwrap();
                let allocated = confirmed_allocation(&services, load.id()).await;
                prop_assert!(current.remaining_trucks() <= current.no_of_trucks());
                prop_assert_eq!(current.remaining_trucks(), no_of_trucks - allocated);
                prop_assert_eq!(
                    current.status() == LoadStatus::Booked,
                    current.remaining_trucks() == 0
                );

                let mut pools = 0;
                let mut held = 0;
                for carrier in &carriers {
                    pools += large_pool(&services, carrier.id()).await;
                    held += services
                        .bookings
                        .for_transporter(carrier.id())
                        .await
                        .unwrap()
                        .iter()
                        .filter(|b| b.status() == BookingStatus::Confirmed)
                        .map(|b| b.allocated_trucks())
                        .sum::<u32>();
                }
                prop_assert_eq!(pools + held, 30);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
