//! Occlusion-aware entity repaint.
//!
//! Entities are never drawn onto a freshly cleared screen. Each sub-frame
//! erases what the entities painted last time, restores the static cells
//! beneath them, and only then draws every sprite at its new pose. The
//! restores can land on a neighbour's pixels, so whenever repainting `E` may
//! wipe another entity `O`, `O` is drawn after `E`. That order comes from a
//! visited-tracked work list per entity, so a cascade touches each entity at
//! most once.

use std::collections::{HashMap, VecDeque};

use arrayvec::ArrayVec;
use tracing::trace;

use crate::atlas::{sprite_rect, Atlas};
use crate::coords::Layout;
use crate::field_painter::FieldPainter;
use crate::interp::{pose_of, Pose};
use crate::surface::{Rect, Surface, Transform};
use crate::types::{
    Cell, EntityKind, Heading, MovingEntity, FOOTPRINT_HISTORY, FRIGHTENED_ROW, PLAYER_CLOSED_COLUMN,
    PLAYER_MOUTH_FRAMES, PLAYER_ROW, PURSUER_FRAMES, PURSUER_IDLE_COLUMN,
};
use tui_pacman_core::Field;

/// Inset between a block and the sprite drawn inside it.
const SPRITE_INSET: u32 = 2;

/// Pixels last painted for an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub rect: Rect,
    pub pose: Pose,
}

/// Bounded FIFO of a pursuer's recent footprints.
#[derive(Debug, Clone, Default)]
pub struct FootprintHistory {
    entries: ArrayVec<Footprint, FOOTPRINT_HISTORY>,
}

impl FootprintHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// Drop and return the oldest entry when there is no room left.
    pub fn evict_if_full(&mut self) -> Option<Footprint> {
        if self.entries.is_full() {
            Some(self.entries.remove(0))
        } else {
            None
        }
    }

    /// Append, evicting the oldest entry first if needed.
    pub fn push(&mut self, footprint: Footprint) -> Option<Footprint> {
        let evicted = self.evict_if_full();
        self.entries.push(footprint);
        evicted
    }

    pub fn latest(&self) -> Option<&Footprint> {
        self.entries.last()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Footprint> {
        self.entries.iter()
    }
}

/// Whether repainting `e` may have overwritten the pixels of `o`.
///
/// `o` now targets the cell `e` just left, and did not itself just leave the
/// cell `e` moved into. A pursuer restores the static geometry of both its
/// cells, so it also wipes a player standing in its previous cell even when
/// the two swapped places.
pub fn overwrites(e: &MovingEntity, o: &MovingEntity) -> bool {
    if o.cell != e.prev_cell {
        return false;
    }
    let restores_both_cells = !e.is_player() && o.is_player();
    restores_both_cells || o.prev_cell != e.cell
}

/// Which entity of a frame a repaint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntitySlot {
    Player,
    /// Index into the frame's pursuer slice.
    Pursuer(usize),
}

/// One entity repaint performed during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repaint {
    pub entity: EntitySlot,
    /// Entity that seeded the cascade this repaint belongs to.
    pub cascade: EntitySlot,
    /// Entity whose repaint queued this one; `None` for the seed itself.
    pub triggered_by: Option<EntitySlot>,
}

/// What a call to [`EntityRenderer::render_entities`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// `false` when the frame was skipped because the atlas is not ready.
    pub drawn: bool,
    pub repaints: Vec<Repaint>,
}

impl FrameReport {
    pub fn repaint_count(&self, entity: EntitySlot) -> usize {
        self.repaints.iter().filter(|r| r.entity == entity).count()
    }

    /// Repaints belonging to the cascade seeded by `seed`, in order.
    pub fn cascade(&self, seed: EntitySlot) -> impl Iterator<Item = &Repaint> {
        self.repaints.iter().filter(move |r| r.cascade == seed)
    }
}

/// Atlas `(row, col)` of the player sprite.
pub fn player_sprite(heading: Heading, render_tick: u64) -> (u32, u32) {
    let col = if heading.is_none() {
        PLAYER_CLOSED_COLUMN
    } else {
        PLAYER_MOUTH_FRAMES - 1 - (render_tick % PLAYER_MOUTH_FRAMES as u64) as u32
    };
    (PLAYER_ROW, col)
}

/// Atlas `(row, col)` of a pursuer sprite.
///
/// Vulnerable pursuers use the frightened row and ignore their heading.
pub fn pursuer_sprite(pursuer: &MovingEntity, render_tick: u64) -> (u32, u32) {
    let phase = if render_tick % PURSUER_FRAMES as u64 == 0 { 1 } else { 0 };
    if pursuer.vulnerable {
        return (FRIGHTENED_ROW, phase);
    }
    let row = match pursuer.kind {
        EntityKind::Pursuer(color) => color.atlas_row(),
        EntityKind::Player => PLAYER_ROW,
    };
    let base = if pursuer.heading.is_none() {
        PURSUER_IDLE_COLUMN
    } else {
        pursuer.heading as u32 * 2
    };
    (row, base + phase)
}

/// Renderer-owned state for moving entities.
///
/// Holds footprints and animation counters; one instance per surface.
#[derive(Debug)]
pub struct EntityRenderer {
    layout: Layout,
    painter: FieldPainter,
    render_tick: u64,
    player_footprint: Option<Footprint>,
    histories: HashMap<u32, FootprintHistory>,
}

impl EntityRenderer {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            painter: FieldPainter::new(layout),
            render_tick: 0,
            player_footprint: None,
            histories: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn painter(&self) -> &FieldPainter {
        &self.painter
    }

    /// Number of frames drawn so far; drives sprite animation.
    pub fn render_tick(&self) -> u64 {
        self.render_tick
    }

    pub fn player_footprint(&self) -> Option<&Footprint> {
        self.player_footprint.as_ref()
    }

    pub fn footprint_history(&self, pursuer_id: u32) -> Option<&FootprintHistory> {
        self.histories.get(&pursuer_id)
    }

    /// Paint the whole field and forget every footprint.
    pub fn paint_field<S: Surface>(&mut self, surface: &mut S, field: &Field) {
        self.painter.paint_field(surface, field);
        self.player_footprint = None;
        self.histories.clear();
    }

    /// Repaint every moving entity at sub-fraction `f`.
    ///
    /// All erasing happens before any sprite is drawn, so nothing drawn this
    /// frame is wiped again. Sprites then go down in [`plan_repaints`] order.
    /// Without an atlas this does nothing at all, not even advance the
    /// animation counter.
    pub fn render_entities<S: Surface>(
        &mut self,
        surface: &mut S,
        atlas: Option<&Atlas>,
        field: &Field,
        player: &MovingEntity,
        pursuers: &[MovingEntity],
        f: f32,
    ) -> FrameReport {
        let Some(atlas) = atlas else {
            trace!("atlas not ready, skipping entity repaint");
            return FrameReport::default();
        };
        self.render_tick += 1;

        for pursuer in pursuers {
            self.evict_oldest(surface, field, pursuer);
        }
        self.clear_player(surface);
        self.restore_pursuer_cells(surface, field, pursuers);

        let repaints = plan_repaints(player, pursuers);
        for repaint in &repaints {
            match repaint.entity {
                EntitySlot::Player => {
                    self.draw_player(surface, atlas, player, f);
                }
                EntitySlot::Pursuer(i) => {
                    self.draw_pursuer(surface, atlas, &pursuers[i], f);
                }
            }
            if let Some(by) = repaint.triggered_by {
                trace!(entity = ?repaint.entity, triggered_by = ?by, seed = ?repaint.cascade, "cascade repaint");
            }
        }

        FrameReport {
            drawn: true,
            repaints,
        }
    }

    fn clear_player<S: Surface>(&mut self, surface: &mut S) {
        if let Some(old) = self.player_footprint.take() {
            // Inset keeps the wall edges shared with neighbouring cells.
            surface.clear_rect(old.rect.inset(1));
        }
    }

    /// Restore the static cells under every pursuer, each cell once.
    fn restore_pursuer_cells<S: Surface>(&self, surface: &mut S, field: &Field, pursuers: &[MovingEntity]) {
        let mut cells: Vec<Cell> = Vec::with_capacity(pursuers.len() * 2);
        for pursuer in pursuers {
            for cell in [pursuer.prev_cell, pursuer.cell] {
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        for cell in cells {
            self.painter.paint_cell(surface, field, cell);
        }
    }

    /// Draw the player at its pose for `f` and remember the footprint.
    fn draw_player<S: Surface>(
        &mut self,
        surface: &mut S,
        atlas: &Atlas,
        player: &MovingEntity,
        f: f32,
    ) -> Footprint {
        let pose = pose_of(player, f);
        let rect = self.layout.pose_rect(pose);
        let (row, col) = player_sprite(player.heading, self.render_tick);
        let bs = self.layout.block_size() as f32;
        let side = self.layout.block_size() - 2 * SPRITE_INSET;
        let half = side as f32 / 2.0;
        // Rotate the right-facing sprite about its own centre.
        let transform = Transform::identity()
            .translate(rect.x as f32 + bs / 2.0, rect.y as f32 + bs / 2.0)
            .rotate_degrees(player.heading.quarter_turns() as f32 * 90.0)
            .translate(-half, -half);
        surface.draw_image(atlas, sprite_rect(row, col), Rect::new(0, 0, side, side), &transform);

        let footprint = Footprint { rect, pose };
        self.player_footprint = Some(footprint);
        footprint
    }

    /// Draw a pursuer at its pose for `f` and record the footprint.
    fn draw_pursuer<S: Surface>(
        &mut self,
        surface: &mut S,
        atlas: &Atlas,
        pursuer: &MovingEntity,
        f: f32,
    ) -> Footprint {
        let pose = pose_of(pursuer, f);
        let rect = self.layout.pose_rect(pose);
        let (row, col) = pursuer_sprite(pursuer, self.render_tick);
        let side = self.layout.block_size() - 2 * SPRITE_INSET;
        let dst = Rect::new(
            rect.x + SPRITE_INSET as i32,
            rect.y + SPRITE_INSET as i32,
            side,
            side,
        );
        surface.draw_image(atlas, sprite_rect(row, col), dst, &Transform::identity());

        let footprint = Footprint { rect, pose };
        // The frame-start eviction already made room.
        self.histories.entry(pursuer.id).or_default().push(footprint);
        footprint
    }

    fn evict_oldest<S: Surface>(&mut self, surface: &mut S, field: &Field, pursuer: &MovingEntity) {
        let Some(history) = self.histories.get_mut(&pursuer.id) else {
            return;
        };
        if let Some(old) = history.evict_if_full() {
            surface.clear_rect(old.rect.inset(1));
            self.painter.paint_region(surface, field, old.rect);
        }
    }
}

fn slot_index(slot: EntitySlot) -> usize {
    match slot {
        EntitySlot::Player => 0,
        EntitySlot::Pursuer(i) => i + 1,
    }
}

/// Order in which a frame draws its entities.
///
/// Every entity seeds a cascade, player first and then pursuers in order.
/// Inside a cascade, an entity overwritten by one already queued is queued
/// after it, each entity at most once. An entity reached by several
/// cascades keeps only its last position, so every entity is drawn once per
/// frame and lands above everything that overwrites it.
pub fn plan_repaints(player: &MovingEntity, pursuers: &[MovingEntity]) -> Vec<Repaint> {
    let entity = |slot: EntitySlot| match slot {
        EntitySlot::Player => player,
        EntitySlot::Pursuer(i) => &pursuers[i],
    };
    let slots = || std::iter::once(EntitySlot::Player).chain((0..pursuers.len()).map(EntitySlot::Pursuer));

    let mut trace = Vec::with_capacity(pursuers.len() + 1);
    let mut queue = VecDeque::with_capacity(pursuers.len() + 1);
    for seed in slots() {
        let mut visited = vec![false; pursuers.len() + 1];
        visited[slot_index(seed)] = true;
        queue.push_back((seed, None));

        while let Some((slot, triggered_by)) = queue.pop_front() {
            trace.push(Repaint {
                entity: slot,
                cascade: seed,
                triggered_by,
            });
            let e = entity(slot);
            for other in slots() {
                let i = slot_index(other);
                if !visited[i] && overwrites(e, entity(other)) {
                    visited[i] = true;
                    queue.push_back((other, Some(slot)));
                }
            }
        }
    }

    let mut last = vec![0; pursuers.len() + 1];
    for (pos, repaint) in trace.iter().enumerate() {
        last[slot_index(repaint.entity)] = pos;
    }
    trace
        .into_iter()
        .enumerate()
        .filter(|(pos, repaint)| last[slot_index(repaint.entity)] == *pos)
        .map(|(_, repaint)| repaint)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PixelBuffer;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::types::{Cell, PursuerColor};

    fn open_field(w: usize, h: usize) -> Field {
        let rows: Vec<String> = (0..h).map(|_| " ".repeat(w)).collect();
        Field::from_rows(&rows).unwrap()
    }

    fn setup(field: &Field) -> (EntityRenderer, RecordingSurface) {
        let layout = Layout::with_block_size(field.width(), field.height(), 10).unwrap();
        let (w, h) = layout.surface_size();
        (EntityRenderer::new(layout), RecordingSurface::new(w, h))
    }

    fn walker(id: u32, from: (u32, u32), to: (u32, u32)) -> MovingEntity {
        MovingEntity::pursuer(id, PursuerColor::Red, Cell::from(from)).moved(Cell::from(from), Cell::from(to))
    }

    #[test]
    fn swap_repaints_player_after_pursuer() {
        let player = MovingEntity::player(Cell::new(15, 15)).moved(Cell::new(15, 15), Cell::new(15, 16));
        let pursuer = walker(1, (15, 16), (15, 15));
        assert!(overwrites(&pursuer, &player));
        assert!(!overwrites(&player, &pursuer));

        let field = open_field(31, 31);
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let report = r.render_entities(&mut s, Some(&atlas), &field, &player, &[pursuer], 0.5);

        let seeded: Vec<_> = report.cascade(EntitySlot::Pursuer(0)).collect();
        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].entity, EntitySlot::Pursuer(0));
        assert_eq!(seeded[1].entity, EntitySlot::Player);
        assert_eq!(seeded[1].triggered_by, Some(EntitySlot::Pursuer(0)));
    }

    #[test]
    fn pursuer_chain_resolves_each_once() {
        let field = open_field(10, 3);
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(0, 0));

        for tick in 0..2u32 {
            // Three pursuers in single file, each stepping into its leader's old cell.
            let x = 1 + tick;
            let pursuers = [
                walker(1, (1, x), (1, x + 1)),
                walker(2, (1, x + 1), (1, x + 2)),
                walker(3, (1, x + 2), (1, x + 3)),
            ];
            let report = r.render_entities(&mut s, Some(&atlas), &field, &player, &pursuers, 1.0);

            let chain: Vec<EntitySlot> = report
                .cascade(EntitySlot::Pursuer(2))
                .map(|rp| rp.entity)
                .collect();
            assert_eq!(
                chain,
                vec![EntitySlot::Pursuer(2), EntitySlot::Pursuer(1), EntitySlot::Pursuer(0)]
            );
            assert_eq!(report.cascade(EntitySlot::Player).count(), 1);
            for slot in [EntitySlot::Player, EntitySlot::Pursuer(0), EntitySlot::Pursuer(1), EntitySlot::Pursuer(2)] {
                assert_eq!(report.repaint_count(slot), 1, "{slot:?}");
            }
        }
        for id in 1..=3 {
            assert_eq!(r.footprint_history(id).map(|h| h.len()), Some(2));
        }
    }

    #[test]
    fn plan_orders_followers_after_leaders() {
        let pursuers = [
            walker(1, (1, 2), (1, 3)),
            walker(2, (1, 3), (1, 4)),
            walker(3, (1, 4), (1, 5)),
        ];
        let player = MovingEntity::player(Cell::new(4, 0));
        let order: Vec<EntitySlot> = plan_repaints(&player, &pursuers).iter().map(|r| r.entity).collect();
        assert_eq!(
            order,
            vec![
                EntitySlot::Player,
                EntitySlot::Pursuer(2),
                EntitySlot::Pursuer(1),
                EntitySlot::Pursuer(0)
            ]
        );
    }

    #[test]
    fn rotating_cycle_terminates() {
        // Four pursuers chasing each other around a 2x2 block.
        let ring = [(1, 1), (1, 2), (2, 2), (2, 1)];
        let pursuers: Vec<MovingEntity> = (0..4)
            .map(|i| walker(i as u32 + 1, ring[i], ring[(i + 1) % 4]))
            .collect();
        let field = open_field(4, 4);
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(0, 0));

        let report = r.render_entities(&mut s, Some(&atlas), &field, &player, &pursuers, 0.25);
        assert_eq!(report.repaints.len(), 1 + 4);
        // The last seed's cascade goes all the way round the ring.
        assert_eq!(report.cascade(EntitySlot::Pursuer(3)).count(), 4);
        for i in 0..4 {
            assert_eq!(report.repaint_count(EntitySlot::Pursuer(i)), 1);
        }
    }

    #[test]
    fn single_file_sprites_stay_whole() {
        let field = open_field(8, 5);
        let layout = Layout::with_block_size(8, 5, 10).unwrap();
        let (w, h) = layout.surface_size();
        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(4, 0));
        let pursuers = [
            walker(1, (1, 2), (1, 3)),
            walker(2, (1, 3), (1, 4)),
            walker(3, (1, 4), (1, 5)),
        ];

        let mut together = PixelBuffer::new(w, h);
        let mut r = EntityRenderer::new(layout);
        r.paint_field(&mut together, &field);
        r.render_entities(&mut together, Some(&atlas), &field, &player, &pursuers, 0.5);

        for (i, pursuer) in pursuers.iter().enumerate() {
            let mut alone = PixelBuffer::new(w, h);
            let mut solo = EntityRenderer::new(layout);
            solo.paint_field(&mut alone, &field);
            solo.render_entities(&mut alone, Some(&atlas), &field, &player, &[*pursuer], 0.5);

            let sprite = layout.pose_rect(pose_of(pursuer, 0.5)).inset(SPRITE_INSET);
            let mut missing = 0;
            for y in sprite.y..sprite.bottom() {
                for x in sprite.x..sprite.right() {
                    if together.get(x as u32, y as u32) != alone.get(x as u32, y as u32) {
                        missing += 1;
                    }
                }
            }
            assert_eq!(missing, 0, "pursuer {i}");
        }
    }

    #[test]
    fn erasing_finishes_before_any_sprite() {
        let field = Field::from_rows(&["........", "........", "........"]).unwrap();
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(2, 1)).moved(Cell::new(2, 1), Cell::new(2, 2));
        let pursuers = [
            walker(1, (1, 2), (1, 3)),
            walker(2, (1, 3), (1, 4)),
            walker(3, (1, 4), (1, 5)),
        ];

        for step in 1..=2 {
            s.take_commands();
            r.render_entities(&mut s, Some(&atlas), &field, &player, &pursuers, step as f32 / 4.0);
            let commands = s.commands();
            let first_image = commands
                .iter()
                .position(|c| matches!(c, DrawCommand::Image { .. }))
                .unwrap();
            assert!(first_image > 0);
            assert!(commands[first_image..]
                .iter()
                .all(|c| matches!(c, DrawCommand::Image { .. })));
            assert_eq!(commands.len() - first_image, 4);

            // No rect is cleared twice before the sprites go down.
            let clears: Vec<Rect> = commands[..first_image]
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Clear(rect) => Some(*rect),
                    _ => None,
                })
                .collect();
            for (i, rect) in clears.iter().enumerate() {
                assert!(!clears[i + 1..].contains(rect), "{rect:?} cleared twice");
            }
        }
    }

    #[test]
    fn no_atlas_is_a_no_op() {
        let field = open_field(5, 5);
        let (mut r, mut s) = setup(&field);
        let player = MovingEntity::player(Cell::new(2, 2));
        let report = r.render_entities(&mut s, None, &field, &player, &[], 0.5);
        assert!(!report.drawn);
        assert!(s.commands().is_empty());
        assert_eq!(r.render_tick(), 0);
        assert!(r.player_footprint().is_none());
    }

    #[test]
    fn first_frame_animates_from_one() {
        let field = open_field(6, 4);
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(2, 1)).moved(Cell::new(2, 1), Cell::new(2, 2));
        let pursuer = walker(1, (1, 2), (1, 3));
        r.render_entities(&mut s, Some(&atlas), &field, &player, &[pursuer], 0.25);
        assert_eq!(r.render_tick(), 1);

        let srcs: Vec<Rect> = s
            .images()
            .filter_map(|c| match c {
                DrawCommand::Image { src, .. } => Some(*src),
                _ => None,
            })
            .collect();
        let (prow, pcol) = player_sprite(player.heading, 1);
        let (grow, gcol) = pursuer_sprite(&pursuer, 1);
        assert_eq!(pcol, 1);
        assert_eq!(gcol % 2, 0);
        assert_eq!(srcs, vec![sprite_rect(prow, pcol), sprite_rect(grow, gcol)]);
    }

    #[test]
    fn history_is_capped_and_fifo() {
        let field = open_field(8, 3);
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(0, 7));
        let pursuer = walker(7, (1, 2), (1, 3));

        for step in 1..=4 {
            r.render_entities(&mut s, Some(&atlas), &field, &player, &[pursuer], step as f32 / 4.0);
        }
        let history = r.footprint_history(7).unwrap();
        assert!(history.is_full());
        let oldest = *history.iter().next().unwrap();

        s.take_commands();
        r.render_entities(&mut s, Some(&atlas), &field, &player, &[pursuer], 0.0);
        let history = r.footprint_history(7).unwrap();
        assert_eq!(history.len(), FOOTPRINT_HISTORY);
        assert_ne!(history.iter().next(), Some(&oldest));
        assert_eq!(s.commands().first(), Some(&DrawCommand::Clear(oldest.rect.inset(1))));
    }

    #[test]
    fn history_push_evicts_before_insert() {
        let mut h = FootprintHistory::new();
        let fp = |x| Footprint {
            rect: Rect::new(x, 0, 10, 10),
            pose: Pose::default(),
        };
        for x in 0..4 {
            assert_eq!(h.push(fp(x)), None);
        }
        assert_eq!(h.push(fp(4)), Some(fp(0)));
        assert_eq!(h.len(), 4);
        assert_eq!(h.latest(), Some(&fp(4)));
    }

    #[test]
    fn player_sprite_cycles_and_rotates() {
        assert_eq!(player_sprite(Heading::None, 5), (PLAYER_ROW, PLAYER_CLOSED_COLUMN));
        let cols: Vec<u32> = (0..4).map(|t| player_sprite(Heading::Up, t).1).collect();
        assert_eq!(cols, vec![2, 1, 0, 2]);

        let field = open_field(5, 5);
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(2, 2)).moved(Cell::new(2, 2), Cell::new(1, 2));
        r.draw_player(&mut s, &atlas, &player, 0.0);
        let Some(DrawCommand::Image { dst, transform, .. }) = s.images().next().cloned() else {
            panic!("no sprite drawn");
        };
        assert_eq!(dst, Rect::new(0, 0, 6, 6));
        // Facing up: the sprite's top-left corner ends up bottom-left.
        let origin = r.layout().cell_origin(Cell::new(2, 2));
        let (x, y) = transform.apply(0.0, 0.0);
        assert!((x - (origin.x + 2) as f32).abs() < 1e-4);
        assert!((y - (origin.y + 8) as f32).abs() < 1e-4);
    }

    #[test]
    fn pursuer_sprite_is_inset_and_unrotated() {
        let field = open_field(5, 5);
        let (mut r, mut s) = setup(&field);
        let atlas = Atlas::procedural();
        let pursuer = walker(1, (2, 2), (2, 3));
        let footprint = r.draw_pursuer(&mut s, &atlas, &pursuer, 0.0);
        let Some(DrawCommand::Image { dst, transform, .. }) = s.images().next().cloned() else {
            panic!("no sprite drawn");
        };
        assert!(transform.is_identity());
        assert_eq!(dst, Rect::new(footprint.rect.x + 2, footprint.rect.y + 2, 6, 6));
        assert_eq!(r.footprint_history(1).map(|h| h.len()), Some(1));
    }

    #[test]
    fn pursuer_columns() {
        let mut p = walker(1, (3, 3), (3, 4));
        assert_eq!(pursuer_sprite(&p, 0), (1, 1));
        assert_eq!(pursuer_sprite(&p, 1), (1, 0));

        p = walker(1, (3, 3), (4, 3));
        assert_eq!(pursuer_sprite(&p, 2), (1, 3));

        p = MovingEntity::pursuer(1, PursuerColor::Orange, Cell::new(3, 3));
        assert_eq!(pursuer_sprite(&p, 1), (4, PURSUER_IDLE_COLUMN));

        p.vulnerable = true;
        p.heading = Heading::Left;
        assert_eq!(pursuer_sprite(&p, 0), (FRIGHTENED_ROW, 1));
    }

    #[test]
    fn pursuer_leaves_no_trail_over_dots() {
        let field = Field::from_rows(&["#####", "#...#", "#####"]).unwrap();
        let layout = Layout::with_block_size(5, 3, 10).unwrap();
        let (w, h) = layout.surface_size();
        let mut px = PixelBuffer::new(w, h);
        let mut r = EntityRenderer::new(layout);
        r.paint_field(&mut px, &field);
        let clean = px.clone();

        let atlas = Atlas::procedural();
        let player = MovingEntity::player(Cell::new(5, 5));
        let walking = walker(1, (1, 1), (1, 2));
        for s in 1..=4 {
            r.render_entities(&mut px, Some(&atlas), &field, &player, &[walking], s as f32 / 4.0);
        }
        // With the pursuer gone, restoring its two cells leaves nothing behind.
        r.painter().paint_cell(&mut px, &field, Cell::new(1, 2));
        r.painter().paint_cell(&mut px, &field, Cell::new(1, 1));
        assert_eq!(px.pixels(), clean.pixels());
    }
}
