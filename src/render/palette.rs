use eframe::egui::Color32;

use crate::entity::Category;
use crate::network::LinkKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphPalette {
    pub background: Color32,
    pub emphasis: Color32,
    pub initials: Color32,
    pub score_ring: Color32,
    pub link_same_employer: Color32,
    pub link_shared_transaction: Color32,
    pub link_high_affinity: Color32,
    pub tooltip_fill: Color32,
    pub tooltip_border: Color32,
    pub tooltip_title: Color32,
    pub tooltip_text: Color32,
}

impl Default for GraphPalette {
    fn default() -> Self {
        Self::dark()
    }
}

impl GraphPalette {
    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(19, 23, 29),
            emphasis: Color32::from_rgb(59, 130, 246),
            initials: Color32::from_gray(248),
            score_ring: Color32::from_rgb(246, 206, 104),
            link_same_employer: Color32::from_rgba_unmultiplied(96, 165, 250, 150),
            link_shared_transaction: Color32::from_rgba_unmultiplied(52, 211, 153, 170),
            link_high_affinity: Color32::from_rgba_unmultiplied(192, 132, 252, 130),
            tooltip_fill: Color32::from_rgba_unmultiplied(24, 28, 36, 235),
            tooltip_border: Color32::from_rgb(72, 80, 94),
            tooltip_title: Color32::from_gray(245),
            tooltip_text: Color32::from_gray(200),
        }
    }

    pub fn category(&self, category: Category) -> Color32 {
        match category {
            Category::Founder => Color32::from_rgb(245, 158, 11),
            Category::Investor => Color32::from_rgb(16, 185, 129),
            Category::Executive => Color32::from_rgb(139, 92, 246),
            Category::Advisor => Color32::from_rgb(236, 72, 153),
            Category::Banker => Color32::from_rgb(20, 184, 166),
            Category::Organization => Color32::from_rgb(99, 102, 241),
            Category::Uncategorized => Color32::from_rgb(120, 128, 140),
        }
    }

    pub fn link(&self, kind: LinkKind) -> Color32 {
        match kind {
            LinkKind::SameEmployer => self.link_same_employer,
            LinkKind::SharedTransaction => self.link_shared_transaction,
            LinkKind::HighAffinityPair => self.link_high_affinity,
        }
    }
}

pub fn link_width(kind: LinkKind) -> f32 {
    match kind {
        LinkKind::SameEmployer => 2.0,
        LinkKind::SharedTransaction => 2.5,
        LinkKind::HighAffinityPair => 1.5,
    }
}
