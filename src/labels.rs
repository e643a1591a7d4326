use crate::model::Language;

/// Fixed document strings for one language.
pub(crate) struct Labels {
    pub(crate) banner_title: &'static str,
    pub(crate) banner_subtitle: &'static str,
    pub(crate) director: &'static str,
    pub(crate) code: &'static str,
    pub(crate) creation_decree: &'static str,
    pub(crate) domiciliation: &'static str,
    pub(crate) thematic_agency: &'static str,
    pub(crate) email: &'static str,
    pub(crate) phone: &'static str,
    pub(crate) appointment_date: &'static str,
    pub(crate) description_title: &'static str,
    pub(crate) teams_title: &'static str,
    pub(crate) keywords_title: &'static str,
    pub(crate) team: &'static str,
    pub(crate) team_leader: &'static str,
    pub(crate) not_provided: &'static str,
    pub(crate) not_specified: &'static str,
    pub(crate) no_description: &'static str,
    pub(crate) no_teams: &'static str,
    pub(crate) footer_caption: &'static str,
    pub(crate) generated_on: &'static str,
    pub(crate) page: &'static str,
}

static FRENCH: Labels = Labels {
    banner_title: "ANNUAIRE DES LABORATOIRES DE RECHERCHE",
    banner_subtitle: "Fiche d'information scientifique et administrative",
    director: "Directeur",
    code: "Code",
    creation_decree: "Arrêté de création",
    domiciliation: "Domiciliation",
    thematic_agency: "Agence thématique",
    email: "E-mail",
    phone: "Téléphone",
    appointment_date: "Date de nomination",
    description_title: "Description du laboratoire",
    teams_title: "Équipes de recherche",
    keywords_title: "Mots-clés",
    team: "Équipe",
    team_leader: "Responsable",
    not_provided: "N/A",
    not_specified: "Non spécifié",
    no_description: "Aucune description fournie",
    no_teams: "Aucune équipe renseignée",
    footer_caption: "Annuaire des Laboratoires de Recherche",
    generated_on: "Généré le",
    page: "Page",
};

static ARABIC: Labels = Labels {
    banner_title: "دليل مخابر البحث العلمي",
    banner_subtitle: "بطاقة المعلومات العلمية والإدارية",
    director: "المدير",
    code: "الرمز",
    creation_decree: "قرار الإنشاء",
    domiciliation: "مقر المخبر",
    thematic_agency: "الوكالة الموضوعاتية",
    email: "البريد الإلكتروني",
    phone: "الهاتف",
    appointment_date: "تاريخ التعيين",
    description_title: "وصف المخبر",
    teams_title: "فرق البحث",
    keywords_title: "الكلمات المفتاحية",
    team: "فريق",
    team_leader: "المسؤول",
    not_provided: "غير متوفر",
    not_specified: "غير محدد",
    no_description: "لا يوجد وصف",
    no_teams: "لا توجد فرق مسجلة",
    footer_caption: "دليل مخابر البحث",
    generated_on: "أنشئ في",
    page: "صفحة",
};

pub(crate) fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Primary => &FRENCH,
        Language::Secondary => &ARABIC,
    }
}

impl Labels {
    /// Every fixed string, for font subsetting.
    pub(crate) fn all(&self) -> [&'static str; 22] {
        [
            self.banner_title,
            self.banner_subtitle,
            self.director,
            self.code,
            self.creation_decree,
            self.domiciliation,
            self.thematic_agency,
            self.email,
            self.phone,
            self.appointment_date,
            self.description_title,
            self.teams_title,
            self.keywords_title,
            self.team,
            self.team_leader,
            self.not_provided,
            self.not_specified,
            self.no_description,
            self.no_teams,
            self.footer_caption,
            self.generated_on,
            self.page,
        ]
    }
}
