//! 弹窗/对话框状态
//!
//! Exactly one mode is active. Every transition passes through
//! [`ModalMode::None`], which clears the draft and error of the previous mode.

use crate::error::{CoreError, CoreResult};

/// Active modal and the data it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode<D> {
    /// 无弹窗
    None,
    /// 查看详情
    ViewDetails { id: u32 },
    /// 编辑：保留原始值以计算变更字段
    Edit { id: u32, original: D, draft: D },
    /// 确认删除
    Delete { id: u32 },
    /// 新建
    Create { draft: D },
}

/// Mode without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    None,
    ViewDetails,
    Edit,
    Delete,
    Create,
}

/// Action the orchestrator may run against a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Edit,
    Delete,
    Rent,
}

impl ActionKind {
    /// Modal an action requires.
    pub fn required_modal(self) -> ModalKind {
        match self {
            Self::Create => ModalKind::Create,
            Self::Edit => ModalKind::Edit,
            Self::Delete => ModalKind::Delete,
            Self::Rent => ModalKind::ViewDetails,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModalWorkflow<D> {
    mode: ModalMode<D>,
    error: Option<CoreError>,
}

impl<D> Default for ModalWorkflow<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> ModalWorkflow<D> {
    pub fn new() -> Self {
        Self {
            mode: ModalMode::None,
            error: None,
        }
    }

    pub fn mode(&self) -> &ModalMode<D> {
        &self.mode
    }

    pub fn kind(&self) -> ModalKind {
        match self.mode {
            ModalMode::None => ModalKind::None,
            ModalMode::ViewDetails { .. } => ModalKind::ViewDetails,
            ModalMode::Edit { .. } => ModalKind::Edit,
            ModalMode::Delete { .. } => ModalKind::Delete,
            ModalMode::Create { .. } => ModalKind::Create,
        }
    }

    pub fn is_open(&self) -> bool {
        self.kind() != ModalKind::None
    }

    /// Entity the modal is about, if any.
    pub fn target_id(&self) -> Option<u32> {
        match self.mode {
            ModalMode::ViewDetails { id }
            | ModalMode::Edit { id, .. }
            | ModalMode::Delete { id } => Some(id),
            ModalMode::None | ModalMode::Create { .. } => None,
        }
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.mode {
            ModalMode::Edit { draft, .. } | ModalMode::Create { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.mode {
            ModalMode::Edit { draft, .. } | ModalMode::Create { draft } => Some(draft),
            _ => None,
        }
    }

    /// Switch to `mode`, closing whatever is open first.
    pub fn open(&mut self, mode: ModalMode<D>) {
        if self.is_open() {
            log::debug!("closing {:?} modal before opening another", self.kind());
            self.close();
        }
        self.mode = mode;
    }

    pub fn open_view(&mut self, id: u32) {
        self.open(ModalMode::ViewDetails { id });
    }

    pub fn open_delete(&mut self, id: u32) {
        self.open(ModalMode::Delete { id });
    }

    pub fn open_create(&mut self, draft: D) {
        self.open(ModalMode::Create { draft });
    }

    pub fn open_edit(&mut self, id: u32, original: D)
    where
        D: Clone,
    {
        let draft = original.clone();
        self.open(ModalMode::Edit {
            id,
            original,
            draft,
        });
    }

    /// Back to `None`, dropping the draft and error.
    pub fn close(&mut self) {
        self.mode = ModalMode::None;
        self.error = None;
    }

    pub fn permits(&self, action: ActionKind) -> bool {
        self.kind() == action.required_modal()
    }

    /// [`CoreError::NotPermitted`] unless the active mode gates `action`.
    pub fn ensure(&self, action: ActionKind) -> CoreResult<()> {
        if self.permits(action) {
            Ok(())
        } else {
            Err(CoreError::NotPermitted(format!(
                "{action:?} requires the {:?} modal, {:?} is open",
                action.required_modal(),
                self.kind()
            )))
        }
    }

    pub fn error(&self) -> Option<&CoreError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: CoreError) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
