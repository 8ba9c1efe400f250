//! Shelf packing for a single square atlas page.
//!
//! Shelves are horizontal bands stacked from the top of the page. Only the
//! last shelf is open: it grows to the tallest rectangle placed on it. Once a
//! new shelf starts below it, the previous one is closed and its height is
//! fixed, but the space remaining to its right is still handed out to
//! rectangles that fit under that height.

/// A horizontal band of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shelf {
    y: u32,
    height: u32,
    x_cursor: u32,
}

#[derive(Debug, Clone)]
pub struct ShelfPacker {
    size: u32,
    /// All shelves, top to bottom. The last one is the open shelf.
    shelves: Vec<Shelf>,
}

impl ShelfPacker {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            shelves: Vec::new(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Reserve a `width` x `height` rectangle and return its top-left corner,
    /// or `None` if the page has no room for it.
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.size || height > self.size {
            return None;
        }

        // First fit among closed shelves
        let closed = self.shelves.len().saturating_sub(1);
        for shelf in &mut self.shelves[..closed] {
            if height <= shelf.height && shelf.x_cursor + width <= self.size {
                let x = shelf.x_cursor;
                shelf.x_cursor += width;
                return Some((x, shelf.y));
            }
        }

        // The open shelf, which may grow downwards
        let next_y = if let Some(open) = self.shelves.last_mut() {
            if open.x_cursor + width <= self.size && open.y + height.max(open.height) <= self.size
            {
                let x = open.x_cursor;
                open.x_cursor += width;
                open.height = open.height.max(height);
                return Some((x, open.y));
            }
            open.y + open.height
        } else {
            0
        };

        // A new shelf below; the previous open shelf becomes closed
        if next_y + height > self.size {
            return None;
        }
        self.shelves.push(Shelf {
            y: next_y,
            height,
            x_cursor: width,
        });
        Some((0, next_y))
    }

    /// Number of shelves started so far.
    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }
}
