//! Generational keys into the slot maps of a [`MolecularSystem`](super::system::MolecularSystem).
//!
//! Keys stay valid for the lifetime of the system they came from and are never
//! shared between systems.

use slotmap::new_key_type;

new_key_type! {
    /// Key of an atom record.
    pub struct AtomId;
    /// Key of a residue record.
    pub struct ResidueId;
    /// Key of a chain record.
    pub struct ChainId;
}
