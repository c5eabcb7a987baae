//! Commit scheduling.
//!
//! Staged writes are applied band by band: independent blocks first, then
//! delicate fixtures, then attached blocks in dependency order so that
//! whatever a block hangs from is already in place when it is written.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::block::{BlockCatalog, BlockState, PlacementClass};
use crate::core::types::{BlockPos, IVec3};
use crate::edit::context::EditContext;
use crate::edit::ledger::PendingBand;
use crate::world::{BlockBagError, WorldAccess};

/// Counters collected while committing one operation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommitStats {
    /// Writes that changed the world
    pub applied: usize,
    /// Writes refused because the world does not know the type
    pub skipped_invalid: usize,
    /// Writes refused by a mask
    pub skipped_mask: usize,
    /// Writes refused by the block bag
    pub skipped_supply: usize,
    /// Final-band writes dropped because resources were missing
    pub final_skipped: usize,
    /// Dependency cycles broken while ordering the final band
    pub cycles_broken: usize,
    /// Fix-up batches sent to the world
    pub fixup_batches: usize,
}

/// Commit order of a final band
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinalOrder {
    /// Indices into the band, in write order
    pub order: Vec<usize>,
    pub cycles: usize,
}

/// Order final-band writes so every block comes after the pending block it is
/// attached to.
///
/// Starting from each unplaced entry the attachment chain is walked, newest
/// dependency first, until it leaves the pending set or revisits the walk.
/// The lower half of a two-cell structure also pulls in its pending upper
/// half. A revisit is a cycle: the walk stops there and what was walked is
/// written anyway.
pub fn resolve_final_order(entries: &[(BlockPos, BlockState)], catalog: &dyn BlockCatalog) -> FinalOrder {
    let lookup: HashMap<BlockPos, usize> = entries
        .iter()
        .enumerate()
        .map(|(idx, (pos, _))| (*pos, idx))
        .collect();

    let mut remaining = vec![true; entries.len()];
    let mut in_walk = vec![false; entries.len()];
    let mut plan = FinalOrder {
        order: Vec::with_capacity(entries.len()),
        cycles: 0,
    };

    for start in 0..entries.len() {
        if !remaining[start] {
            continue;
        }

        let mut walk = VecDeque::new();
        let mut current = start;
        loop {
            walk.push_front(current);
            in_walk[current] = true;

            let (pos, state) = &entries[current];
            if catalog.is_lower_half(state) {
                if let Some(&upper) = lookup.get(&(*pos + IVec3::Y)) {
                    if remaining[upper] && !in_walk[upper] {
                        walk.push_front(upper);
                        in_walk[upper] = true;
                    }
                }
            }

            let Some(direction) = catalog.attachment(state) else {
                break;
            };
            let next_pos = *pos + direction.offset();
            let Some(&next) = lookup.get(&next_pos) else {
                break;
            };
            if !remaining[next] {
                break;
            }
            if in_walk[next] {
                log::warn!("Attachment cycle at {:?}, committing the walked chain as is", next_pos);
                plan.cycles += 1;
                break;
            }
            current = next;
        }

        for idx in walk {
            in_walk[idx] = false;
            remaining[idx] = false;
            plan.order.push(idx);
        }
    }

    plan
}

impl EditContext<'_> {
    /// Apply one write to the world right now.
    ///
    /// Returns whether the world changed. Out-of-range heights, unknown
    /// types, masked positions and bag refusals are silent no-ops.
    pub(crate) fn raw_set(&mut self, pos: BlockPos, state: &BlockState) -> bool {
        if pos.y < 0 || pos.y > self.world.max_y() {
            return false;
        }
        self.world.ensure_chunk_loaded(pos);

        if !self.world.is_valid_block_type(state.type_id) {
            log::trace!("Skipping write of unknown block type {} at {:?}", state.type_id, pos);
            self.stats.skipped_invalid += 1;
            return false;
        }
        if self.has_mask() {
            let allowed = self.mask_allows(pos);
            self.ledger.record_mask_verdict(pos, allowed);
            if !allowed {
                self.stats.skipped_mask += 1;
                return false;
            }
        }

        let fast = self.env.config.fast_mode;
        let existing = self.world.block(pos);
        let mut placed = state.clone();

        if let Some(bag) = self.env.bag.as_deref_mut() {
            if !placed.is_air() {
                match bag.withdraw(placed.type_id, placed.data) {
                    Ok(()) => {}
                    Err(BlockBagError::NotObtainable(_)) => {
                        self.stats.skipped_supply += 1;
                        return false;
                    }
                    Err(BlockBagError::InsufficientSupply(type_id)) => {
                        self.missing.insert(type_id);
                        self.stats.skipped_supply += 1;
                        return false;
                    }
                }
            }
            if !existing.is_air() {
                let _ = bag.deposit(existing.type_id, existing.data);
            }
            // Contents never travel through a bag
            if self.env.catalog.is_container(placed.type_id) {
                placed = placed.without_payload();
            }
        } else if self.env.catalog.is_container(existing.type_id) {
            self.world.clear_container_contents(pos);
        }

        if self.env.catalog.clear_before_replace(existing.type_id) {
            self.world.set_block_state(pos, &BlockState::AIR, fast);
        }

        if !self.world.uses_variant_data(placed.type_id) {
            placed.data = 0;
        }

        let changed = self.world.set_block_state(pos, &placed, fast);
        if fast {
            self.invalidator.mark_block(pos);
        }
        if changed {
            self.stats.applied += 1;
        }
        changed
    }

    /// Stage a write in the band its placement class calls for, or apply it
    /// directly when queueing is off.
    pub(crate) fn stage(&mut self, pos: BlockPos, state: BlockState) -> bool {
        if !self.env.config.queue_enabled {
            return self.raw_set(pos, &state);
        }

        let existing = self.world.block(pos);
        let changed = !existing.same_kind(&state);

        // A fixture already standing here goes first so nothing pops off
        // when its neighbors change.
        if changed && self.env.catalog.placement_class(existing.type_id) == PlacementClass::Late {
            self.raw_set(pos, &BlockState::AIR);
        }

        let band = PendingBand::for_class(self.env.catalog.placement_class(state.type_id));
        self.ledger.enqueue(band, pos, state);
        changed
    }

    /// Commit every staged write.
    pub fn flush(&mut self) {
        for band in [PendingBand::Deferred, PendingBand::Late] {
            let writes = self.ledger.take_band(band);
            for (pos, state) in &writes {
                self.raw_set(*pos, state);
            }
            self.finish_band(band, writes.len());
        }

        let finals = self.ledger.take_band(PendingBand::Final);
        if !finals.is_empty() && self.env.bag.is_some() && !self.missing.is_empty() {
            log::warn!(
                "Skipping {} attached blocks, block bag is missing {} types",
                finals.len(),
                self.missing.len()
            );
            self.stats.final_skipped += finals.len();
        } else {
            let plan = resolve_final_order(&finals, &*self.env.catalog);
            self.stats.cycles_broken += plan.cycles;
            for idx in plan.order {
                let (pos, state) = &finals[idx];
                self.raw_set(*pos, state);
            }
        }
        self.finish_band(PendingBand::Final, finals.len());
    }

    fn finish_band(&mut self, band: PendingBand, written: usize) {
        if !self.env.config.fast_mode || !self.invalidator.has_dirty() {
            return;
        }
        let columns = self.invalidator.take_dirty_columns();
        log::debug!(
            "Fix-up of {} columns after {} band ({} writes)",
            columns.len(),
            band.name(),
            written
        );
        self.world.fix_up_chunks(&columns);
        self.stats.fixup_batches += 1;
    }

    fn has_mask(&self) -> bool {
        self.env.mask.is_some() || self.op_mask.is_some()
    }

    fn mask_allows(&self, pos: BlockPos) -> bool {
        let world: &dyn WorldAccess = &*self.world;
        self.env.mask.as_deref().is_none_or(|mask| mask.matches(world, pos))
            && self.op_mask.is_none_or(|mask| mask.matches(world, pos))
    }
}
