/// Per-download dialog options, fixed at the moment the download starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DownloadSettings {
    pub as_new_layer: bool,
    pub zoom_to_data: bool,
}

impl DownloadSettings {
    pub fn new(as_new_layer: bool, zoom_to_data: bool) -> Self {
        Self {
            as_new_layer,
            zoom_to_data,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DownloadKind {
    OsmData,
    Gpx,
    Notes,
}

impl DownloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadKind::OsmData => "osm_data",
            DownloadKind::Gpx => "gpx",
            DownloadKind::Notes => "notes",
        }
    }
}

/// Which independently downloadable data types the user ticked in the OSM
/// download source.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DataTypeToggles {
    pub osm_data: bool,
    pub gpx: bool,
    pub notes: bool,
}

impl DataTypeToggles {
    pub fn new(osm_data: bool, gpx: bool, notes: bool) -> Self {
        Self {
            osm_data,
            gpx,
            notes,
        }
    }

    pub fn enabled_kinds(self) -> Vec<DownloadKind> {
        let mut kinds = Vec::new();
        if self.osm_data {
            kinds.push(DownloadKind::OsmData);
        }
        if self.gpx {
            kinds.push(DownloadKind::Gpx);
        }
        if self.notes {
            kinds.push(DownloadKind::Notes);
        }
        kinds
    }

    pub fn any(self) -> bool {
        self.osm_data || self.gpx || self.notes
    }
}
