#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ModeFlags {
    pub watch: bool,
    pub production: bool,
    pub library_deployment: bool,
    pub clean_first: bool,
}
