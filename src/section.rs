use bevy::prelude::*;

/// Panels a trigger zone can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Skills,
    Contact,
    VideoStudio,
    ImageStudio,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Skills => "Skills",
            Section::Contact => "Contact",
            Section::VideoStudio => "Video Studio",
            Section::ImageStudio => "Image Studio",
        }
    }
}

/// Which overlay, if any, is on screen
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActiveSection {
    /// Driving around, no overlay
    #[default]
    Home,
    Open(Section),
}

impl ActiveSection {
    pub fn section(self) -> Option<Section> {
        match self {
            ActiveSection::Home => None,
            ActiveSection::Open(section) => Some(section),
        }
    }
}

/// Written when the player asks to enter a zone's panel
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEntered {
    pub section: Section,
}

/// Written by overlay close controls
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct SectionClosed;

/// Owns the `ActiveSection` state and the messages that move it
pub struct SectionPlugin;

impl Plugin for SectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ActiveSection>()
            .add_message::<SectionEntered>()
            .add_message::<SectionClosed>()
            .add_systems(Update, (open_entered_section, close_section).chain());
    }
}

/// Opens the requested panel when nothing else is showing
pub fn open_entered_section(
    mut entered: MessageReader<SectionEntered>,
    current: Res<State<ActiveSection>>,
    mut next: ResMut<NextState<ActiveSection>>,
) {
    let Some(request) = entered.read().last().copied() else {
        return;
    };

    if *current.get() != ActiveSection::Home {
        debug!("ignoring {:?}, {:?} is already open", request.section, current.get());
        return;
    }

    info!("opening {}", request.section.title());
    next.set(ActiveSection::Open(request.section));
}

/// Returns to driving
pub fn close_section(
    mut closed: MessageReader<SectionClosed>,
    current: Res<State<ActiveSection>>,
    mut next: ResMut<NextState<ActiveSection>>,
) {
    if closed.read().count() == 0 {
        return;
    }

    if let ActiveSection::Open(section) = *current.get() {
        info!("closing {}", section.title());
        next.set(ActiveSection::Home);
    }
}
