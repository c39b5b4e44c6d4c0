use super::{DomainBundle, DomainCatalog, KeywordRule};
use crate::models::{Cluster, Statement};

type StatementRow = (&'static str, &'static str, &'static str);
type ClusterRow = (&'static str, &'static str);

struct Seed {
    key: &'static str,
    title: &'static str,
    description: &'static str,
    main_theme: &'static str,
    statements: &'static [StatementRow],
    clusters: &'static [ClusterRow],
}

const SEEDS: &[Seed] = &[
    // Urban communities
    Seed {
        key: "crime-public-safety",
        title: "Public Safety and Crime Prevention",
        description: "Balancing community safety with civil liberties and police accountability",
        main_theme: "How should communities approach public safety and crime prevention?",
        statements: &[
            ("Increase police patrols in high-crime neighborhoods", "enforcement", "Law & Order"),
            ("Invest in community programs to address root causes of crime", "prevention", "Prevention Focus"),
            ("Install more security cameras in public spaces", "surveillance", "Security First"),
            ("Expand mental health crisis response teams", "health-response", "Health Approach"),
            ("Create neighborhood watch programs", "community-engagement", "Community Involvement"),
            ("Improve street lighting in all neighborhoods", "infrastructure", "Environmental Design"),
            ("Implement police body cameras and civilian oversight", "accountability", "Reform Focus"),
            ("Ban certain types of weapons in city limits", "weapons-policy", "Gun Control"),
            ("Focus on drug rehabilitation over incarceration", "drug-policy", "Treatment First"),
            ("Increase penalties for repeat offenders", "sentencing", "Tough on Crime"),
        ],
        clusters: &[
            ("Law & Order", "Support traditional policing and enforcement"),
            ("Prevention Focus", "Address root causes through community programs"),
            ("Reform Focus", "Police accountability and criminal justice reform"),
            ("Health Approach", "Treat crime as public health issue"),
        ],
    },
    Seed {
        key: "housing-affordability",
        title: "Housing Affordability Crisis",
        description: "Addressing the growing gap between incomes and housing costs",
        main_theme: "How should communities tackle the housing affordability crisis?",
        statements: &[
            ("Require 20% affordable units in all new developments", "inclusion", "Housing Justice"),
            ("Limit rent increases to inflation rate plus 2%", "rent-control", "Tenant Protection"),
            ("Offer tax incentives for developers building affordable housing", "incentives", "Market Solutions"),
            ("Prevent displacement by giving existing residents first right to purchase", "anti-displacement", "Community Stability"),
            ("Allow higher density development near transit", "zoning", "Smart Growth"),
            ("Create community land trusts to maintain affordability", "land-trust", "Community Ownership"),
            ("Invest in existing neighborhoods without displacement", "equitable-development", "Inclusive Development"),
            ("Provide down payment assistance for first-time homebuyers", "homeownership", "Ownership Support"),
            ("Rehabilitate existing housing stock before building new", "preservation", "Conservation First"),
            ("Link housing assistance to local job opportunities", "workforce-housing", "Economic Integration"),
        ],
        clusters: &[
            ("Housing Justice", "Housing as a human right requiring strong protections"),
            ("Market Solutions", "Use incentives and market mechanisms"),
            ("Community Stability", "Prevent displacement of existing residents"),
            ("Smart Growth", "Increase density and development strategically"),
        ],
    },
    Seed {
        key: "infrastructure",
        title: "Infrastructure and Public Services",
        description: "Maintaining and improving essential city services and infrastructure",
        main_theme: "How should cities prioritize infrastructure investments and service delivery?",
        statements: &[
            ("Fix roads and sidewalks before building new ones", "maintenance", "Maintenance First"),
            ("Upgrade water and sewer systems to handle climate change", "utilities", "Climate Resilience"),
            ("Invest in high-speed internet as a public utility", "broadband", "Digital Equity"),
            ("Extend public transit to underserved neighborhoods", "transit-equity", "Service Equity"),
            ("Build more parks and recreational facilities", "recreation", "Quality of Life"),
            ("Prioritize green infrastructure for stormwater management", "green-infrastructure", "Environmental Solutions"),
            ("Increase frequency of trash and recycling pickup", "waste-management", "Basic Services"),
            ("Expand library hours and services", "library-services", "Public Resources"),
            ("Improve emergency response times", "emergency-services", "Safety & Security"),
            ("Use smart city technology to optimize services", "smart-city", "Technology Solutions"),
        ],
        clusters: &[
            ("Maintenance First", "Fix existing infrastructure before building new"),
            ("Climate Resilience", "Prepare infrastructure for climate change"),
            ("Service Equity", "Ensure all neighborhoods get quality services"),
            ("Technology Solutions", "Use smart city tech to improve efficiency"),
        ],
    },
    Seed {
        key: "local-economy",
        title: "Local Economy and Jobs",
        description: "Supporting economic development while ensuring benefits reach all residents",
        main_theme: "How should cities promote economic growth that benefits everyone?",
        statements: &[
            ("Provide low-interest loans to small businesses", "small-business", "Local Business Support"),
            ("Require living wages for all city-funded projects", "wage-policy", "Worker Rights"),
            ("Create job training programs for green economy jobs", "job-training", "Future Skills"),
            ("Support local hiring requirements for major developments", "local-hire", "Community Benefits"),
            ("Invest in startup incubators and innovation hubs", "innovation", "Entrepreneurship"),
            ("Protect existing affordable commercial spaces", "commercial-preservation", "Anti-Displacement"),
            ("Expand public markets and support local farmers", "local-food", "Local Economy"),
            ("Create worker cooperative development programs", "cooperatives", "Democratic Economy"),
            ("Attract major employers with tax incentives", "business-incentives", "Corporate Attraction"),
            ("Invest in tourism and cultural attractions", "tourism", "Cultural Economy"),
        ],
        clusters: &[
            ("Local Business Support", "Prioritize small and local businesses"),
            ("Worker Rights", "Focus on wages and working conditions"),
            ("Community Benefits", "Ensure development benefits existing residents"),
            ("Innovation Economy", "Attract tech and knowledge-based industries"),
        ],
    },
    // Suburban towns
    Seed {
        key: "traffic-school-safety",
        title: "Traffic Congestion and School Safety",
        description: "Managing traffic flow while ensuring student safety",
        main_theme: "How should suburban communities balance traffic efficiency with school safety?",
        statements: &[
            ("Install traffic lights at all school crossings", "safety-infrastructure", "Safety First"),
            ("Create car-free zones around schools during pickup/dropoff", "pedestrian-zones", "Pedestrian Priority"),
            ("Require speed bumps on all residential streets near schools", "traffic-calming", "Slow Traffic"),
            ("Build dedicated school bus lanes on main roads", "bus-infrastructure", "Transit Solutions"),
            ("Implement variable speed limits during school hours", "dynamic-limits", "Flexible Systems"),
            ("Increase police presence during school hours", "enforcement", "Law Enforcement"),
            ("Build underground parking for school events", "parking-solutions", "Infrastructure Investment"),
            ("Encourage walking school buses and bike trains", "active-transport", "Community Organizing"),
            ("Install smart traffic signals that respond to pedestrians", "smart-systems", "Technology Solutions"),
            ("Create neighborhood traffic committees with enforcement power", "community-control", "Local Governance"),
        ],
        clusters: &[
            ("Safety First", "Prioritize student safety over traffic convenience"),
            ("Slow Traffic", "Use infrastructure to reduce vehicle speeds"),
            ("Community Organizing", "Grassroots solutions and active transportation"),
            ("Technology Solutions", "Smart systems and dynamic traffic management"),
        ],
    },
    Seed {
        key: "property-taxes",
        title: "Property Tax Policy and Equity",
        description: "Balancing municipal revenue needs with taxpayer burden",
        main_theme: "How should property taxes be structured to be fair and sustainable?",
        statements: &[
            ("Cap annual property tax increases at 2% regardless of home value", "tax-caps", "Taxpayer Protection"),
            ("Provide property tax exemptions for seniors and disabled residents", "exemptions", "Vulnerable Protection"),
            ("Tax commercial properties at higher rates than residential", "differential-rates", "Business Burden"),
            ("Use property taxes primarily for schools and essential services", "spending-priorities", "Essential Services"),
            ("Implement income-based property tax relief programs", "income-adjustment", "Progressive Taxation"),
            ("Regular reassessment to ensure current market values", "assessment-frequency", "Fair Assessment"),
            ("Create tax increment financing for development projects", "tif-policy", "Development Tools"),
            ("Transparent budget process with public input on tax rates", "transparency", "Democratic Process"),
            ("Regional property tax sharing to reduce inequality", "regional-sharing", "Regional Equity"),
            ("Phase in tax increases for long-term residents", "phase-in", "Stability Focus"),
        ],
        clusters: &[
            ("Taxpayer Protection", "Keep taxes low and predictable for residents"),
            ("Progressive Taxation", "Tax based on ability to pay and income"),
            ("Essential Services", "Focus spending on core municipal functions"),
            ("Democratic Process", "Transparent decision-making with public input"),
        ],
    },
    // Rural areas
    Seed {
        key: "digital-infrastructure",
        title: "Digital Infrastructure and Connectivity Gap",
        description: "Bridging the rural-urban digital divide",
        main_theme: "How should rural communities address internet and digital access gaps?",
        statements: &[
            ("Treat high-speed internet as a public utility like electricity", "public-utility", "Digital Rights"),
            ("Use federal grants to build fiber optic networks", "federal-funding", "Infrastructure Investment"),
            ("Partner with private companies for service expansion", "public-private", "Market Partnership"),
            ("Create community-owned broadband cooperatives", "cooperatives", "Community Ownership"),
            ("Provide free wifi hotspots in all public buildings", "public-access", "Public Access"),
            ("Require internet service as condition for new development", "development-requirements", "Growth Management"),
            ("Subsidize internet costs for low-income rural families", "affordability", "Digital Equity"),
            ("Build cell towers to improve mobile coverage first", "mobile-priority", "Mobile First"),
            ("Focus on satellite internet solutions for remote areas", "satellite-solutions", "Alternative Technology"),
            ("Train residents in digital literacy and tech skills", "digital-literacy", "Education Focus"),
        ],
        clusters: &[
            ("Digital Rights", "Internet access as fundamental public service"),
            ("Infrastructure Investment", "Major public investment in fiber networks"),
            ("Community Ownership", "Local control through cooperatives"),
            ("Market Partnership", "Work with private sector for solutions"),
        ],
    },
    // University towns
    Seed {
        key: "student-housing-shortage",
        title: "Student Housing Crisis and Community Impact",
        description: "Addressing housing shortages while maintaining community character",
        main_theme: "How should university towns manage student housing needs?",
        statements: &[
            ("Require universities to house 100% of students on campus", "on-campus-mandate", "University Responsibility"),
            ("Build high-density student housing near campus only", "zoning-restrictions", "Containment Strategy"),
            ("Allow housing conversion in all residential neighborhoods", "citywide-conversion", "Market Solutions"),
            ("Create rent stabilization for student housing", "rent-control", "Price Protection"),
            ("Tax university endowment to fund community housing", "university-taxation", "University Pays"),
            ("Limit the number of unrelated students per household", "occupancy-limits", "Neighborhood Protection"),
            ("Build public transit from campus to affordable areas", "transit-solutions", "Transportation Focus"),
            ("Partner with developers on mixed-income housing", "mixed-income", "Integration Approach"),
            ("Create housing cooperatives for students and families", "housing-coops", "Alternative Models"),
            ("Require landlord registration and regular inspections", "housing-standards", "Quality Control"),
        ],
        clusters: &[
            ("University Responsibility", "Universities should solve their own housing needs"),
            ("Neighborhood Protection", "Preserve residential character and family housing"),
            ("Market Solutions", "Allow development and conversion where needed"),
            ("Integration Approach", "Mix students and families in same neighborhoods"),
        ],
    },
    Seed {
        key: "transportation",
        title: "Transportation Policy & Equity",
        description: "Balancing transportation options, costs, and accessibility",
        main_theme: "How should communities prioritize different transportation modes and policies?",
        statements: &[
            ("Public transit should be free for all residents, funded by higher parking fees", "transit-equity", "Transit Advocates"),
            ("Cities should prioritize bike lanes over car parking spaces", "active-transport", "Active Transportation"),
            ("Ride-sharing services should be regulated like traditional taxis", "ride-share", "Traditional Regulation"),
            ("New housing developments must include car-free options with transit passes", "transit-oriented", "Transit Advocates"),
            ("Electric scooters should have designated parking areas, not sidewalk placement", "micro-mobility", "Order & Safety"),
            ("Highway expansion should stop in favor of regional rail investment", "infrastructure", "Transit Advocates"),
            ("Low-income residents should get transportation vouchers for any mode", "equity", "Equity Focus"),
            ("Autonomous vehicles will solve traffic better than public transit", "tech-solutions", "Tech Optimists"),
            ("Neighborhood streets should prioritize pedestrians over car flow", "street-design", "Active Transportation"),
            ("Parking fees should be based on income with sliding scale pricing", "economic-equity", "Equity Focus"),
        ],
        clusters: &[
            ("Transit Advocates", "Support public transit investment and car alternatives"),
            ("Active Transportation", "Prioritize walking, cycling, and human-scale mobility"),
            ("Equity Focus", "Emphasize access for low-income residents"),
            ("Tech Optimists", "Believe technology will solve transportation challenges"),
        ],
    },
    Seed {
        key: "housing",
        title: "Housing Development & Community Character",
        description: "Managing growth, affordability, and neighborhood identity",
        main_theme: "How should communities balance new housing with existing character?",
        statements: &[
            ("New developments should match existing neighborhood density and size", "character", "Character Preservationists"),
            ("Single-family zoning should be eliminated to allow duplexes", "zoning", "Housing Advocates"),
            ("All developments should include 15% affordable housing units", "affordability", "Affordability Focus"),
            ("Property taxes should fund first-time homebuyer programs", "homeownership", "Community Support"),
            ("Short-term rentals should be banned in residential areas", "str-policy", "Neighborhood Stability"),
            ("Developers should pay fees to fund schools and infrastructure", "impact-fees", "Community Investment"),
            ("Homeowners should get tax credits for installing solar panels", "energy", "Sustainability Focus"),
            ("All new homes should be required to include solar power systems", "energy-mandate", "Sustainability Focus"),
            ("Community solar gardens should be prioritized over individual systems", "community-energy", "Community Investment"),
            ("Energy-efficient home retrofits should be funded by utility rebates", "efficiency", "Sustainability Focus"),
        ],
        clusters: &[
            ("Character Preservationists", "Protect existing neighborhood character"),
            ("Housing Advocates", "Increase supply through zoning reform"),
            ("Affordability Focus", "Prevent displacement and reduce costs"),
            ("Community Investment", "Ensure development benefits residents"),
            ("Sustainability Focus", "Prioritize environmental and energy considerations"),
        ],
    },
    Seed {
        key: "education",
        title: "Education Funding & Priorities",
        description: "Allocating limited resources among competing educational needs",
        main_theme: "How should public schools prioritize spending to serve all students?",
        statements: &[
            ("Reduce class sizes even if it means cutting art and music programs", "class-size", "Basic Academics"),
            ("Technology spending should be prioritized over building renovations", "tech-vs-facilities", "Innovation Focus"),
            ("Schools should offer full-day pre-K funded by higher property taxes", "early-childhood", "Early Investment"),
            ("Eliminate gifted programs to focus resources on struggling students", "equity-vs-excellence", "Equity Focus"),
            ("Charter schools improve education more than increased traditional funding", "school-choice", "Choice Advocates"),
            ("Teacher pay should be based on student performance metrics", "merit-pay", "Accountability Focus"),
            ("Schools should provide free meals and supplies to all students", "universal-services", "Universal Support"),
            ("Vocational programs should get equal funding to college prep", "career-paths", "Practical Skills"),
            ("School districts should consolidate to reduce administrative costs", "consolidation", "Efficiency Focus"),
            ("Mental health counselors should be prioritized over tutoring", "wellness", "Whole Child"),
        ],
        clusters: &[
            ("Basic Academics", "Focus on core subjects and fundamentals"),
            ("Equity Focus", "Prioritize struggling and disadvantaged students"),
            ("Innovation Focus", "Invest in technology and modern approaches"),
            ("Whole Child", "Support student wellness and development"),
        ],
    },
];

const ALIASES: &[(&str, &str)] = &[
    // Urban communities
    ("crime-public-safety", "crime-public-safety"),
    ("housing-affordability", "housing-affordability"),
    ("economic-development", "local-economy"),
    ("infrastructure-services", "infrastructure"),
    ("transportation", "transportation"),
    // Suburban towns
    ("traffic-school-safety", "traffic-school-safety"),
    ("infrastructure-maintenance", "infrastructure"),
    ("school-quality", "education"),
    ("property-taxes", "property-taxes"),
    ("environmental-concerns", "infrastructure"),
    // Rural areas
    ("digital-infrastructure", "digital-infrastructure"),
    ("healthcare-access", "infrastructure"),
    ("economic-opportunities", "local-economy"),
    ("aging-population", "infrastructure"),
    ("infrastructure-decay", "infrastructure"),
    // University towns
    ("student-housing-shortage", "student-housing-shortage"),
    ("town-gown-relations", "local-economy"),
    ("parking-transportation", "transportation"),
    ("noise-disruption", "crime-public-safety"),
    ("economic-dependence", "local-economy"),
    // Catalog keys
    ("housing", "housing"),
    ("education", "education"),
    ("local-economy", "local-economy"),
    ("infrastructure", "infrastructure"),
];

const HOUSING_KEYWORDS: &[&str] = &[
    "housing", "rent", "affordable", "development", "zoning", "homelessness",
    "home", "house", "property", "real estate", "mortgage", "landlord", "tenant",
    "apartment", "condo", "neighborhood", "residential", "gentrification",
    "solar", "energy", "power", "electricity", "utilities", "hvac", "heating",
    "cooling", "insulation", "renovation", "construction", "building",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "school", "education", "teacher", "student", "learning",
    "classroom", "curriculum", "graduation", "college", "university",
    "kindergarten", "elementary", "middle school", "high school",
    "academic", "literacy", "math", "science", "arts", "sports",
    "extracurricular", "funding", "budget", "principal", "administrator",
];

const TRANSPORTATION_KEYWORDS: &[&str] = &[
    "transportation", "transit", "bus", "train", "subway", "metro",
    "car", "vehicle", "traffic", "parking", "road", "highway",
    "bike", "bicycle", "pedestrian", "walkability", "commute",
    "rideshare", "uber", "lyft", "taxi", "scooter", "infrastructure",
];

const GUIDANCE: &[(&str, &str)] = &[
    ("crime-public-safety", "public safety, policing, crime prevention and the balance between enforcement and civil liberties"),
    ("housing-affordability", "housing costs, rent burden, displacement and tools for keeping homes affordable"),
    ("infrastructure", "roads, utilities, public facilities and how basic city services are prioritized and funded"),
    ("local-economy", "jobs, small businesses, wages and who benefits from local economic growth"),
    ("traffic-school-safety", "traffic congestion, street design and keeping students safe on their way to school"),
    ("property-taxes", "property tax fairness, exemptions and how municipal revenue is raised and spent"),
    ("digital-infrastructure", "broadband access, connectivity gaps and digital inclusion in rural areas"),
    ("student-housing-shortage", "student housing pressure in a university town and its effect on long-time residents"),
    ("transportation", "transit, cycling, walking, parking and equitable access to getting around"),
    ("housing", "new housing development, zoning, affordability, energy and neighborhood character"),
    ("education", "public school funding, priorities and how resources are shared among students"),
];

const DEFAULT_GUIDANCE: &str =
    "a pressing local issue on which residents hold genuinely different views";

fn keyword_rule(domain: &str, keywords: &[&str]) -> KeywordRule {
    KeywordRule {
        domain: domain.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

pub(super) fn catalog() -> DomainCatalog {
    let domains = SEEDS
        .iter()
        .map(|seed| DomainBundle {
            key: seed.key.to_string(),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            main_theme: seed.main_theme.to_string(),
            statements: seed
                .statements
                .iter()
                .map(|(text, category, cluster)| Statement {
                    text: text.to_string(),
                    category: category.to_string(),
                    expected_cluster: cluster.to_string(),
                })
                .collect(),
            clusters: seed
                .clusters
                .iter()
                .map(|(name, description)| Cluster {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        })
        .collect();

    DomainCatalog {
        domains,
        aliases: ALIASES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        keyword_rules: vec![
            keyword_rule("housing", HOUSING_KEYWORDS),
            keyword_rule("education", EDUCATION_KEYWORDS),
            keyword_rule("transportation", TRANSPORTATION_KEYWORDS),
        ],
        default_domain: "housing".to_string(),
        guidance: GUIDANCE
            .iter()
            .map(|(key, phrase)| (key.to_string(), phrase.to_string()))
            .collect(),
        default_guidance: DEFAULT_GUIDANCE.to_string(),
    }
}
