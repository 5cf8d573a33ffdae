use std::sync::Arc;

use crate::assets::AssetProvider;
use crate::errors::Result;
use crate::keyboard::composer::{self, ComposeReport};
use crate::keyboard::handles::{HandleTable, KeyboardHandles};
use crate::keyboard::layout::KeyboardLayout;
use crate::keyboard::settings::{GroupProps, RigSettings};
use crate::scene::{NodeHandle, Scene};

/// Name of the pass-through container that carries [`GroupProps`].
const CONTAINER_NAME: &str = "keyboard_rig";

/// One mounted keyboard.
///
/// Owns the subtree it builds inside the host's [`Scene`] and the
/// [`KeyboardHandles`] it exposes. The handles container is created here and
/// returned by every [`render`](Self::render), so hosts can keep it across
/// re-renders.
pub struct KeyboardRig {
    resource_id: String,
    props: GroupProps,
    settings: RigSettings,
    layout: KeyboardLayout,
    handles: Arc<KeyboardHandles>,
    container: Option<NodeHandle>,
    last_report: ComposeReport,
}

impl KeyboardRig {
    #[must_use]
    pub fn new(resource_id: &str, props: GroupProps, mut settings: RigSettings) -> Self {
        settings.normalize();
        let layout = KeyboardLayout::standard();

        for key in settings.unknown_keys(&layout) {
            log::warn!("Configured key '{key}' is not on the layout and will never be bound");
        }

        Self {
            resource_id: resource_id.to_string(),
            props,
            settings,
            layout,
            handles: Arc::new(KeyboardHandles::new()),
            container: None,
            last_report: ComposeReport::default(),
        }
    }

    /// Resolves the asset and (re)builds the keyboard.
    ///
    /// On resolution failure nothing is built, the previous build (if any)
    /// stays mounted, and the error is returned.
    pub fn render(
        &mut self,
        scene: &mut Scene,
        provider: &dyn AssetProvider,
    ) -> Result<Arc<KeyboardHandles>> {
        let assets = provider.resolve(&self.resource_id)?;

        if let Some(previous) = self.container.take() {
            scene.remove_node(previous);
        }

        let container = scene
            .build_node(CONTAINER_NAME)
            .with_transform(self.props.transform())
            .with_visible(self.props.visible)
            .build();

        let composition =
            composer::compose(scene, Some(container), &assets, &self.layout, &self.settings);
        let table = HandleTable::from_bindings(
            composition.bindings,
            self.settings.switch_components_enabled(),
        );

        log::info!(
            "Mounted '{}': {} nodes, {} slots bound",
            self.resource_id,
            scene.descendants(container).len(),
            table.bound_count()
        );

        self.handles.publish(table);
        self.container = Some(container);
        self.last_report = composition.report;

        Ok(Arc::clone(&self.handles))
    }

    /// Removes the keyboard and invalidates every exposed handle at once.
    pub fn unmount(&mut self, scene: &mut Scene) {
        if let Some(container) = self.container.take() {
            scene.remove_node(container);
            log::info!("Unmounted '{}'", self.resource_id);
        }
        self.handles.clear();
        self.last_report = ComposeReport::default();
    }

    /// The stable handles container.
    #[inline]
    #[must_use]
    pub fn handles(&self) -> Arc<KeyboardHandles> {
        Arc::clone(&self.handles)
    }

    /// Top-level container carrying the group props, while mounted.
    #[inline]
    #[must_use]
    pub fn container(&self) -> Option<NodeHandle> {
        self.container
    }

    #[inline]
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Mesh instances skipped by the last render.
    #[inline]
    #[must_use]
    pub fn last_report(&self) -> &ComposeReport {
        &self.last_report
    }

    /// Updates the pass-through props. Applied immediately when mounted.
    pub fn set_props(&mut self, scene: &mut Scene, props: GroupProps) {
        self.props = props;
        if let Some(container) = self.container
            && let Some(node) = scene.get_node_mut(container)
        {
            node.transform = props.transform();
            node.visible = props.visible;
        }
    }
}
