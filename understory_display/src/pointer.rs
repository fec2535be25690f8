// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer routing to interactive nodes.
//!
//! Every container on stage that [`mouse_enabled`](Stage::mouse_enabled)
//! reports as enabled is tested against the pointer position with
//! [`hit_test_point`](Stage::hit_test_point). Targets are visited in tree
//! order, parents before children, and each hit target gets its own event.

use kurbo::Point;
use tracing::trace;
use understory_event::{EventPayload, EventType};

use crate::stage::Stage;
use crate::types::{NodeFlags, NodeId};

impl Stage {
    /// Report a pointer move to stage coordinates `point`.
    ///
    /// Targets the pointer entered get `mouseOver`, targets it is inside get
    /// `mouseMove`, and targets it left get `mouseOut`.
    pub fn pointer_move(&mut self, point: Point) {
        for id in self.pointer_targets() {
            let inside = self.pointer_hits(id, point);
            let Some(node) = self.tree.get_mut(id) else {
                continue;
            };
            let was_inside = node.flags.contains(NodeFlags::POINTER_INSIDE);
            node.flags.set(NodeFlags::POINTER_INSIDE, inside);

            match (was_inside, inside) {
                (false, true) => {
                    trace!(?id, "pointer entered");
                    self.pointer_event(id, EventType::MOUSE_OVER, point);
                    self.pointer_event(id, EventType::MOUSE_MOVE, point);
                }
                (true, true) => self.pointer_event(id, EventType::MOUSE_MOVE, point),
                (true, false) => {
                    trace!(?id, "pointer left");
                    self.pointer_event(id, EventType::MOUSE_OUT, point);
                }
                (false, false) => {}
            }
        }
    }

    /// Report a click at stage coordinates `point`.
    ///
    /// Returns how many targets were hit.
    pub fn pointer_click(&mut self, point: Point) -> usize {
        self.pointer_press(point, EventType::CLICK)
    }

    /// Report a double click at stage coordinates `point`.
    ///
    /// Returns how many targets were hit.
    pub fn pointer_double_click(&mut self, point: Point) -> usize {
        self.pointer_press(point, EventType::DOUBLE_CLICK)
    }

    fn pointer_press(&mut self, point: Point, kind: EventType) -> usize {
        let mut hits = 0;
        for id in self.pointer_targets() {
            if self.pointer_hits(id, point) {
                hits += 1;
                self.pointer_event(id, kind.clone(), point);
            }
        }
        hits
    }

    /// Interactive nodes on stage, in pre-order.
    fn pointer_targets(&self) -> Vec<NodeId> {
        let mut targets = self.tree.subtree(self.root);
        targets.retain(|&id| self.kind(id).is_some_and(|k| k.is_interactive()));
        targets
    }

    fn pointer_hits(&self, id: NodeId, point: Point) -> bool {
        self.mouse_enabled(id) && self.hit_test_point(id, point).unwrap_or(false)
    }

    fn pointer_event(&mut self, id: NodeId, kind: EventType, point: Point) {
        let Ok(local) = self.global_to_local(id, point) else {
            return;
        };
        self.notify(
            id,
            kind,
            EventPayload::Pointer {
                stage_x: point.x,
                stage_y: point.y,
                local_x: local.x,
                local_y: local.y,
            },
        );
    }
}
