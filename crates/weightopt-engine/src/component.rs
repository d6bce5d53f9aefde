use std::ops::{Index, IndexMut};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// A graded component of the course.
///
/// The declaration order is the canonical order used for generator ranges,
/// reports and tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Component {
    #[display("assignment")]
    Assignment,
    #[display("quiz")]
    Quiz,
    #[display("project")]
    Project,
}

impl Component {
    pub const LEN: usize = 3;
    pub const ALL: [Self; Self::LEN] = [Self::Assignment, Self::Quiz, Self::Project];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Distribution<Component> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> Component
    where
        R: Rng + ?Sized,
    {
        Component::ALL[rng.random_range(0..Component::LEN)]
    }
}

/// One value per [`Component`].
///
/// Serializes as an object keyed by component name
/// (`{"assignment": .., "quiz": .., "project": ..}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentMap<T> {
    pub assignment: T,
    pub quiz: T,
    pub project: T,
}

impl<T> ComponentMap<T> {
    pub const fn new(assignment: T, quiz: T, project: T) -> Self {
        Self {
            assignment,
            quiz,
            project,
        }
    }

    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Component) -> T,
    {
        Self {
            assignment: f(Component::Assignment),
            quiz: f(Component::Quiz),
            project: f(Component::Project),
        }
    }

    #[must_use]
    pub fn map<U, F>(&self, mut f: F) -> ComponentMap<U>
    where
        F: FnMut(&T) -> U,
    {
        ComponentMap::from_fn(|c| f(&self[c]))
    }

    /// Iterates over the values in canonical component order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        Component::ALL.into_iter().map(|c| &self[c])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &T)> + '_ {
        Component::ALL.into_iter().map(|c| (c, &self[c]))
    }
}

impl<T> From<[T; Component::LEN]> for ComponentMap<T> {
    fn from([assignment, quiz, project]: [T; Component::LEN]) -> Self {
        Self::new(assignment, quiz, project)
    }
}

impl<T> Index<Component> for ComponentMap<T> {
    type Output = T;

    fn index(&self, component: Component) -> &T {
        match component {
            Component::Assignment => &self.assignment,
            Component::Quiz => &self.quiz,
            Component::Project => &self.project,
        }
    }
}

impl<T> IndexMut<Component> for ComponentMap<T> {
    fn index_mut(&mut self, component: Component) -> &mut T {
        match component {
            Component::Assignment => &mut self.assignment,
            Component::Quiz => &mut self.quiz,
            Component::Project => &mut self.project,
        }
    }
}
