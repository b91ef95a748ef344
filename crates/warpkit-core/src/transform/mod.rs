//! Transform types and operations.
//!
//! This module provides the transform trait, the parametric and dense
//! transforms, and the ordered stack that composes them.

pub mod trait_;
pub mod identity;
pub mod translation;
pub mod affine;
pub mod displacement_field;
pub mod stack;

pub use trait_::Transform;
pub use identity::IdentityTransform;
pub use translation::TranslationTransform;
pub use affine::AffineTransform;
pub use displacement_field::DisplacementFieldTransform;
pub use stack::TransformStack;
