use dive_common::{Vector2, ViewBounds, Viewport};

/// Screen-sized camera that eases toward a wished-for centre.
#[derive(Debug, Clone)]
pub struct Camera {
    center: Vector2,
    wish: Vector2,
    screen: Vector2,
    follow_speed: f32,
    follow_radius: f32,
}

impl Camera {
    pub fn new(center: Vector2, screen_width: f32, screen_height: f32) -> Self {
        Self {
            center,
            wish: center,
            screen: Vector2::new(screen_width, screen_height),
            follow_speed: 60.0,
            follow_radius: 20.0,
        }
    }

    /// Push the wished-for centre down (or up, for negative `dy`).
    pub fn scroll(&mut self, dy: f32) {
        self.wish.y += dy;
    }

    /// Ease one frame toward the wish. Returns `true` if the camera moved.
    pub fn follow(&mut self) -> bool {
        let before = self.center;
        self.center
            .reach(self.wish, self.follow_speed, Some(self.follow_radius));
        self.center != before
    }

    /// World position of a point given in screen coordinates.
    pub fn to_world(&self, screen: Vector2) -> Vector2 {
        self.visible_bounds().top_left() + screen
    }
}

impl Viewport for Camera {
    fn visible_bounds(&self) -> ViewBounds {
        let top_left = self.center - self.screen / 2.0;
        ViewBounds::new(top_left.x, top_left.y, self.screen.x, self.screen.y)
    }
}
