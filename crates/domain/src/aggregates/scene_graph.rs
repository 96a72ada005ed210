//! SceneGraph - the scene collection of one chapter and its id resolver

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::Scene;
use crate::error::{ContentIssue, DomainError};
use crate::ids::SceneId;

/// Scenes in declaration order, indexed by id.
///
/// # Invariants
///
/// - at least one scene
/// - scene ids are unique
///
/// Both are enforced on construction, so `entry_scene` always succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Scene>", into = "Vec<Scene>")]
pub struct SceneGraph {
    scenes: Vec<Scene>,
    index: HashMap<SceneId, usize>,
}

impl SceneGraph {
    pub fn new(scenes: Vec<Scene>) -> Result<Self, DomainError> {
        if scenes.is_empty() {
            return Err(DomainError::validation("chapter has no scenes"));
        }
        let mut index = HashMap::with_capacity(scenes.len());
        for (position, scene) in scenes.iter().enumerate() {
            if index.insert(scene.id.clone(), position).is_some() {
                return Err(DomainError::validation(format!(
                    "duplicate scene id '{}'",
                    scene.id
                )));
            }
        }
        Ok(Self { scenes, index })
    }

    pub fn resolve(&self, scene_id: &SceneId) -> Result<&Scene, DomainError> {
        self.get(scene_id)
            .ok_or_else(|| DomainError::not_found("Scene", scene_id.as_str()))
    }

    pub fn get(&self, scene_id: &SceneId) -> Option<&Scene> {
        self.index.get(scene_id).map(|&i| &self.scenes[i])
    }

    pub fn contains(&self, scene_id: &SceneId) -> bool {
        self.index.contains_key(scene_id)
    }

    /// The character-select scene if there is one, else the first scene.
    pub fn entry_scene(&self) -> &Scene {
        self.scenes
            .iter()
            .find(|s| s.is_character_select())
            .unwrap_or(&self.scenes[0])
    }

    /// Second declared scene; where character select goes without a `next`.
    pub fn second_scene(&self) -> Option<&Scene> {
        self.scenes.get(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Every reference that names no scene in this graph.
    pub fn dangling_references(&self) -> Vec<ContentIssue> {
        self.scenes
            .iter()
            .flat_map(|scene| {
                scene
                    .references()
                    .into_iter()
                    .filter(|(_, target)| !self.contains(target))
                    .map(move |(field, target)| ContentIssue::dangling(&scene.id, field, target))
            })
            .collect()
    }
}

impl TryFrom<Vec<Scene>> for SceneGraph {
    type Error = DomainError;

    fn try_from(scenes: Vec<Scene>) -> Result<Self, Self::Error> {
        Self::new(scenes)
    }
}

impl From<SceneGraph> for Vec<Scene> {
    fn from(graph: SceneGraph) -> Self {
        graph.scenes
    }
}
