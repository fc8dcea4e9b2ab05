//! Persistence seam for the marketplace core.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use fablink_assemblies::{Assembly, Part, PartSpecification};
use fablink_core::{AssemblyId, DomainResult, OfferId, OrderId, PartId};
use fablink_offers::Offer;
use fablink_orders::Order;

/// Storage contract for orders, offers, parts, assemblies and
/// specifications.
///
/// Semantics the services rely on:
///
/// - Fetches fail with `NotFound` when the row is absent.
/// - Every multi-row method (`insert_offer`, `commit_decline`,
///   `commit_acceptance`, `insert_assembly`, `set_build_orders`) is
///   **atomic**: either every row lands or none does. A mid-sequence
///   failure is reported as `Persistence` and the caller re-issues the
///   whole operation.
/// - The offer methods mutate the **stored** order under the write guard
///   rather than persisting a caller snapshot, so the `Order.offers` list
///   never loses a concurrent append. Racing conflicting writes surface as
///   `Conflict`.
/// - Store failures (unavailable backend, poisoned lock) are `Persistence`.
pub trait MarketStore: Send + Sync {
    // Orders ----------------------------------------------------------------

    fn insert_order(&self, order: Order) -> DomainResult<()>;

    fn fetch_order(&self, id: OrderId) -> DomainResult<Order>;

    fn update_order(&self, order: &Order) -> DomainResult<()>;

    // Offers ----------------------------------------------------------------

    /// Insert an offer and append its id to the stored order (advancing
    /// `OrderCreated → ManufacturerOffer` on the first one) as one commit.
    /// Fails with `Conflict` if the stored order meanwhile selected a
    /// winner or was archived. Returns the updated order.
    fn insert_offer(&self, offer: &Offer) -> DomainResult<Order>;

    fn fetch_offer(&self, id: OfferId) -> DomainResult<Offer>;

    fn offers_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Offer>>;

    /// Decline an offer and drop its id from the stored order as one
    /// commit. Fails with `Conflict` if the offer was accepted meanwhile.
    fn commit_decline(
        &self,
        offer_id: OfferId,
        now: DateTime<Utc>,
    ) -> DomainResult<(Order, Offer)>;

    /// Commit an acceptance against the stored rows: mark the offer
    /// accepted, apply the selection to its order and decline every other
    /// open offer, all in one transaction. Fails with `Conflict` if a
    /// racing acceptance already selected a winner. Returns the updated
    /// order, the winner and the declined siblings.
    fn commit_acceptance(
        &self,
        offer_id: OfferId,
        now: DateTime<Utc>,
    ) -> DomainResult<(Order, Offer, Vec<Offer>)>;

    // Parts -----------------------------------------------------------------

    /// Upsert decomposed parts. Part ids are derived, so re-registering the
    /// same upload replaces rows in place.
    fn upsert_parts(&self, parts: &[Part]) -> DomainResult<()>;

    fn fetch_part(&self, id: PartId) -> DomainResult<Part>;

    fn parts_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Part>>;

    // Assemblies ------------------------------------------------------------

    /// Insert an assembly and its part links as one commit. Re-verifies the
    /// partition invariant under the write guard and fails with `Conflict`
    /// if a racing insert claimed one of the parts.
    fn insert_assembly(&self, assembly: &Assembly, part_ids: &[PartId]) -> DomainResult<()>;

    fn fetch_assembly(&self, id: AssemblyId) -> DomainResult<Assembly>;

    fn assemblies_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Assembly>>;

    fn update_assembly(&self, assembly: &Assembly) -> DomainResult<()>;

    /// Part ids linked to one assembly, in link order.
    fn assembly_parts(&self, assembly_id: AssemblyId) -> DomainResult<Vec<PartId>>;

    /// All part ids already claimed by any assembly of the order.
    fn assigned_part_ids(&self, order_id: OrderId) -> DomainResult<HashSet<PartId>>;

    /// Replace the full build sequence of an order in one batch write.
    fn set_build_orders(
        &self,
        order_id: OrderId,
        sequence: &[(AssemblyId, u32)],
    ) -> DomainResult<()>;

    // Specifications --------------------------------------------------------

    /// Upsert on the unique `(assembly_id, part_id)` key.
    fn upsert_specification(&self, spec: &PartSpecification) -> DomainResult<()>;

    fn specification(
        &self,
        assembly_id: AssemblyId,
        part_id: PartId,
    ) -> DomainResult<Option<PartSpecification>>;

    fn specifications_for_assembly(
        &self,
        assembly_id: AssemblyId,
    ) -> DomainResult<Vec<PartSpecification>>;
}
