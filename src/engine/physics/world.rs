use std::num::NonZeroUsize;

use rapier2d::prelude::*;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Bodies with user forces pending for the next step
    forced_bodies: Vec<RigidBodyHandle>,
}

impl PhysicsWorld {
    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        Self {
            gravity,
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            forced_bodies: Vec::new(),
        }
    }

    /// Configure solver effort per step.
    ///
    /// `velocity` maps to the number of solver iterations and `position` to
    /// the internal stabilization passes run inside each of them.
    pub fn set_solver_iterations(&mut self, velocity: usize, position: usize) {
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.num_internal_pgs_iterations = position.max(1);
    }

    /// Step the physics simulation forward by `dt` seconds.
    ///
    /// The step is taken as-is: large values are neither clamped nor split
    /// into sub-steps. A non-positive `dt` leaves the world untouched.
    /// Forces added before the call act on this step only.
    pub fn step(&mut self, dt: Real) {
        if dt <= 0.0 {
            return;
        }

        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        for handle in self.forced_bodies.drain(..) {
            if let Some(body) = self.rigid_body_set.get_mut(handle) {
                body.reset_forces(false);
            }
        }
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// The first collider attached to a body, if any
    pub fn first_collider(&self, body: RigidBodyHandle) -> Option<ColliderHandle> {
        self.rigid_body_set
            .get(body)
            .and_then(|b| b.colliders().first().copied())
    }

    /// Check whether a world-space point lies inside a collider.
    ///
    /// Points exactly on the boundary count as inside.
    pub fn test_point(&self, handle: ColliderHandle, point: Point<Real>) -> bool {
        self.collider_set
            .get(handle)
            .map(|collider| {
                let pose = self.collider_pose(collider);
                collider.shape().contains_point(&pose, &point)
            })
            .unwrap_or(false)
    }

    /// World pose of a collider, following its parent body's current position
    fn collider_pose(&self, collider: &Collider) -> Isometry<Real> {
        let parent = collider
            .parent()
            .and_then(|h| self.rigid_body_set.get(h))
            .zip(collider.position_wrt_parent());

        match parent {
            Some((body, local)) => body.position() * local,
            None => *collider.position(),
        }
    }

    /// Accumulate a force at the body's center of mass and wake it up
    pub fn apply_force_to_center(&mut self, handle: RigidBodyHandle, force: Vector<Real>) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_force(force, true);
            if !self.forced_bodies.contains(&handle) {
                self.forced_bodies.push(handle);
            }
        }
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Number of rigid bodies in the world
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Get references to internal components for debug rendering
    pub fn debug_data(&self) -> DebugData<'_> {
        DebugData {
            rigid_bodies: &self.rigid_body_set,
            colliders: &self.collider_set,
        }
    }
}

/// Data structure for debug rendering
pub struct DebugData<'a> {
    pub rigid_bodies: &'a RigidBodySet,
    pub colliders: &'a ColliderSet,
}
