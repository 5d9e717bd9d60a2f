/// Physics collaborator. Nothing is simulated yet; the game loop only needs
/// something to initialise and step.
#[derive(Debug, Default)]
pub struct PhysicsManager;

impl PhysicsManager {
    pub fn new() -> Self {
        Self
    }

    pub fn init(&mut self) -> bool {
        true
    }

    pub fn simulate(&mut self) {}
}
