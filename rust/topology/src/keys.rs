// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based BRep storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid for the lifetime of
//! the arena (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for a vertex (point in 3D space).
    pub struct VertexKey;

    /// Key for an edge (segment between two vertices, shared by adjacent faces).
    pub struct EdgeKey;

    /// Key for a loop (closed, ordered ring of vertices bounding a face).
    pub struct LoopKey;

    /// Key for a face (planar region with one outer loop and optional holes).
    pub struct FaceKey;

    /// Key for a shell (connected set of faces).
    pub struct ShellKey;

    /// Key for a solid (outer shell plus void shells).
    pub struct SolidKey;
}
