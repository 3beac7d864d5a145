// Receive buffers are generic over these so that the frame body lands on an address
// valid for the widest number type it carries.

/// Primitive number types usable as raw frame storage.
pub trait Align1: bytemuck::Pod {}

impl Align1 for u8 {}
impl Align1 for u32 {}
impl Align1 for u64 {}
impl Align1 for f32 {}
impl Align1 for f64 {}

/// Primitive number types that are at least 4 bytes aligned, `f32` payloads can be
/// viewed in place on top of them.
pub trait Align4: Align1 {}

impl Align4 for u32 {}
impl Align4 for u64 {}
impl Align4 for f32 {}
impl Align4 for f64 {}
