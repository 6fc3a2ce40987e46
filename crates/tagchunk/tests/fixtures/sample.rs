mod shapes {
    /// A point on the plane.
    pub struct Point {
        x: i32,
        y: i32,
    }

    impl Point {
        /// Makes the origin.
        pub fn origin() -> Self {
            Self { x: 0, y: 0 }
        }
    }
}

fn main() {
    let _ = shapes::Point::origin();
}
