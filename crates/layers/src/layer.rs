#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub &'static str);

pub trait Layer {
    fn id(&self) -> LayerId;
}
