//! Geometry for touch placements. The controller never lays anything out;
//! the front-end reports where each drop target was drawn.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point
{
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect
{
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect
{
    /// Edges count as inside.
    pub fn contains(&self, point: Point) -> bool
    {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

pub trait TargetLayout
{
    fn bounds(&self, target: usize) -> Option<Rect>;
}

impl TargetLayout for [Rect]
{
    fn bounds(&self, target: usize) -> Option<Rect>
    {
        self.get(target).copied()
    }
}

impl TargetLayout for Vec<Rect>
{
    fn bounds(&self, target: usize) -> Option<Rect>
    {
        self.as_slice().bounds(target)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchDrag
{
    pub item: usize,
    pub origin: Point,
    pub position: Point,
}

impl TouchDrag
{
    pub fn begin(item: usize, at: Point) -> Self
    {
        Self {
            item,
            origin: at,
            position: at,
        }
    }

    pub fn move_to(&mut self, at: Point)
    {
        self.position = at;
    }

    /// How far the item has travelled from where the touch began.
    pub fn offset(&self) -> (f32, f32)
    {
        (self.position.x - self.origin.x, self.position.y - self.origin.y)
    }
}
