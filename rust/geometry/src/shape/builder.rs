// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face-set accumulation: one open shell at a time, closed sets queued for
//! the kernel.

use crate::error::{Error, Result};
use crate::shape::face::TessellatedFace;

/// Sealed faces of one shell
#[derive(Debug, Clone, PartialEq)]
pub struct FaceSet {
    /// Step id of the entity that opened the set
    pub owner: u32,
    pub faces: Vec<TessellatedFace>,
}

impl FaceSet {
    pub fn new(owner: u32) -> Self {
        Self {
            owner,
            faces: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct FaceSetBuilder {
    open: Option<FaceSet>,
    closed: Vec<FaceSet>,
}

impl FaceSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, owner: u32) -> Result<()> {
        if self.open.is_some() {
            return Err(Error::InvalidOperation("a face set is already open"));
        }
        self.open = Some(FaceSet::new(owner));
        Ok(())
    }

    pub fn add_face(&mut self, face: TessellatedFace) -> Result<()> {
        let set = self
            .open
            .as_mut()
            .ok_or(Error::InvalidOperation("no face set is open"))?;
        set.faces.push(face);
        Ok(())
    }

    /// Closes the open set and returns its face count.
    ///
    /// An empty set is dropped rather than queued.
    pub fn close(&mut self) -> Result<usize> {
        let set = self
            .open
            .take()
            .ok_or(Error::InvalidOperation("no face set is open"))?;
        let count = set.len();
        if count > 0 {
            self.closed.push(set);
        }
        Ok(count)
    }

    /// Drops the open set without queueing it
    pub fn abandon(&mut self) -> Option<FaceSet> {
        self.open.take()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Faces in the open set
    pub fn open_face_count(&self) -> usize {
        self.open.as_ref().map_or(0, FaceSet::len)
    }

    /// Number of closed sets waiting for a build
    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    /// Removes and returns every closed set
    pub fn take_closed(&mut self) -> Vec<FaceSet> {
        std::mem::take(&mut self.closed)
    }

    pub fn clear(&mut self) {
        self.open = None;
        self.closed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn face() -> TessellatedFace {
        TessellatedFace {
            outer: vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            inner: Vec::new(),
            material: None,
        }
    }

    #[test]
    fn open_add_close() {
        let mut builder = FaceSetBuilder::new();
        builder.open(5).unwrap();
        builder.add_face(face()).unwrap();
        builder.add_face(face()).unwrap();
        assert_eq!(builder.open_face_count(), 2);
        assert_eq!(builder.close().unwrap(), 2);

        let sets = builder.take_closed();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].owner, 5);
        assert_eq!(builder.closed_count(), 0);
    }

    #[test]
    fn misuse_is_invalid_operation() {
        let mut builder = FaceSetBuilder::new();
        assert!(builder.close().unwrap_err().is_usage());
        assert!(builder.add_face(face()).unwrap_err().is_usage());
        builder.open(1).unwrap();
        assert!(builder.open(2).unwrap_err().is_usage());
    }

    #[test]
    fn empty_set_is_not_queued() {
        let mut builder = FaceSetBuilder::new();
        builder.open(1).unwrap();
        assert_eq!(builder.close().unwrap(), 0);
        assert_eq!(builder.closed_count(), 0);
    }

    #[test]
    fn abandoned_set_is_not_queued() {
        let mut builder = FaceSetBuilder::new();
        builder.open(1).unwrap();
        builder.add_face(face()).unwrap();
        assert_eq!(builder.abandon().map(|s| s.len()), Some(1));
        assert!(!builder.is_open());
        assert_eq!(builder.closed_count(), 0);
    }
}
