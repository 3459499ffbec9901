use crate::error::IdsExhausted;
use serde::{Deserialize, Serialize};

/// Hands out strictly increasing ids. One allocator is shared by every
/// scheduler call of a season initialization run so fixture ids never collide
/// across competitions.
///
/// `u32::MAX` is never handed out: once the next id would pass it, allocation fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        IdAllocator { next: first }
    }

    pub fn allocate(&mut self) -> Result<u32, IdsExhausted> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(IdsExhausted { at: id })?;
        Ok(id)
    }

    pub fn peek(&self) -> u32 {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_strictly_increasing() {
        let mut ids = IdAllocator::starting_at(100);

        assert_eq!(ids.allocate(), Ok(100));
        assert_eq!(ids.allocate(), Ok(101));
        assert_eq!(ids.peek(), 102);
    }

    #[test]
    fn allocation_stops_at_the_ceiling() {
        let mut ids = IdAllocator::starting_at(u32::MAX - 1);

        assert_eq!(ids.allocate(), Ok(u32::MAX - 1));
        assert_eq!(ids.allocate(), Err(IdsExhausted { at: u32::MAX }));
        assert_eq!(ids.allocate(), Err(IdsExhausted { at: u32::MAX }));
        assert_eq!(ids.peek(), u32::MAX);
    }
}
