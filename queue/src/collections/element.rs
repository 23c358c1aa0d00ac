use std::fmt::Debug;
use std::sync::Arc;

/// Values that can be moved through an [`AsyncBoundedQueue`](crate::collections::AsyncBoundedQueue).<br/>
/// The async traits require `Sync` on the queue itself, so elements have to be shareable across tasks.
pub trait Element: Debug + Send + Sync + 'static {}

macro_rules! impl_element_for_primitives {
  ($($ty:ty),* $(,)?) => {
    $(impl Element for $ty {})*
  };
}

impl_element_for_primitives!(i8, i16, i32, i64, isize);
impl_element_for_primitives!(u8, u16, u32, u64, usize);
impl_element_for_primitives!(f32, f64, bool, char);

impl Element for String {}

impl Element for &'static str {}

impl<T: Debug + Send + Sync + 'static> Element for Box<T> {}

impl<T: Debug + Send + Sync + 'static> Element for Arc<T> {}

impl<T: Debug + Send + Sync + 'static> Element for Option<T> {}

impl<A: Element, B: Element> Element for (A, B) {}
